use super::parser::Row;

/// Columns every company spreadsheet must carry. The Portuguese labels are the
/// file contract shared with the CS team's export template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportColumn {
    Company,
    CsOwner,
    Team,
    ContractStart,
    ContractEnd,
    Framework,
    Status,
    NotebookLink,
    ClickUpLink,
    Notes,
}

impl ImportColumn {
    pub const fn ordered() -> [Self; 10] {
        [
            Self::Company,
            Self::CsOwner,
            Self::Team,
            Self::ContractStart,
            Self::ContractEnd,
            Self::Framework,
            Self::Status,
            Self::NotebookLink,
            Self::ClickUpLink,
            Self::Notes,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Company => "Clientes",
            Self::CsOwner => "CS Care",
            Self::Team => "Tech Responsável",
            Self::ContractStart => "Início do Projeto",
            Self::ContractEnd => "Final do Projeto",
            Self::Framework => "Framework",
            Self::Status => "Status do Projeto",
            Self::NotebookLink => "Link do NotebookLM",
            Self::ClickUpLink => "Link do ClickUP",
            Self::Notes => "Observações",
        }
    }

    const fn slot(self) -> usize {
        self as usize
    }
}

pub fn expected_labels() -> Vec<&'static str> {
    ImportColumn::ordered()
        .into_iter()
        .map(ImportColumn::label)
        .collect()
}

/// Position of each expected column inside the uploaded header.
#[derive(Debug, Clone)]
pub(crate) struct ColumnIndex {
    positions: [usize; 10],
}

impl ColumnIndex {
    /// Matches labels exactly (case-sensitive) after dropping byte-order marks.
    /// Extra columns are ignored; on failure returns the missing labels in
    /// schema order.
    pub(crate) fn resolve(header: &[String]) -> Result<Self, Vec<String>> {
        let cleaned: Vec<String> = header
            .iter()
            .map(|cell| cell.replace('\u{feff}', "").trim().to_string())
            .collect();

        let mut positions = [0usize; 10];
        let mut missing = Vec::new();
        for column in ImportColumn::ordered() {
            match cleaned.iter().position(|cell| cell == column.label()) {
                Some(position) => positions[column.slot()] = position,
                None => missing.push(column.label().to_string()),
            }
        }

        if missing.is_empty() {
            Ok(Self { positions })
        } else {
            Err(missing)
        }
    }

    /// Cell text for `column`; short rows read as empty cells.
    pub(crate) fn cell<'a>(&self, row: &'a Row, column: ImportColumn) -> &'a str {
        row.get(self.positions[column.slot()])
            .map(|value| value.trim())
            .unwrap_or("")
    }

    pub(crate) fn optional(&self, row: &Row, column: ImportColumn) -> Option<String> {
        let value = self.cell(row, column);
        (!value.is_empty()).then(|| value.to_string())
    }
}
