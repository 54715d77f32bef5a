use crate::accounts::NewCompany;

use super::dates::parse_cell_date;
use super::lookup::Lookups;
use super::parser::Row;
use super::schema::{ColumnIndex, ImportColumn};

pub(crate) const DEFAULT_STATUS: &str = "Ativo";

/// A data row translated into store terms, before duplicate checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum MappedRow {
    Blank,
    UnknownOwner { name: String, owner: String },
    Ready(NewCompany),
}

pub(crate) fn map_row(columns: &ColumnIndex, lookups: &Lookups, row: &Row) -> MappedRow {
    let name = columns.cell(row, ImportColumn::Company);
    if name.is_empty() {
        return MappedRow::Blank;
    }

    let owner = columns.cell(row, ImportColumn::CsOwner);
    let Some(owner_id) = lookups.owners.resolve(owner) else {
        return MappedRow::UnknownOwner {
            name: name.to_string(),
            owner: owner.to_string(),
        };
    };

    let team_id = lookups.teams.resolve(columns.cell(row, ImportColumn::Team));

    let status = columns
        .optional(row, ImportColumn::Status)
        .unwrap_or_else(|| DEFAULT_STATUS.to_string());

    MappedRow::Ready(NewCompany {
        name: name.to_string(),
        owner_id: Some(owner_id),
        team_id,
        contract_start: parse_cell_date(columns.cell(row, ImportColumn::ContractStart)),
        contract_end: parse_cell_date(columns.cell(row, ImportColumn::ContractEnd)),
        framework: columns.optional(row, ImportColumn::Framework),
        status,
        notebook_link: columns.optional(row, ImportColumn::NotebookLink),
        clickup_link: columns.optional(row, ImportColumn::ClickUpLink),
        tags: split_tags(columns.cell(row, ImportColumn::Notes)),
    })
}

/// Notes become tags, one per `;`-separated or line-separated entry.
fn split_tags(notes: &str) -> Vec<String> {
    notes
        .split([';', '\n'])
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}
