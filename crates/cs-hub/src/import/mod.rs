//! CSV bulk import of company records.
//!
//! An upload is decoded, split into rows, gated on size, row count and header,
//! and then each data row is mapped and persisted on its own. Row failures
//! end up in the [`ImportReport`]; only the request-level gates reject the
//! whole file.

mod dates;
mod lookup;
mod mapping;
mod parser;
mod report;
pub mod router;
mod schema;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::accounts::{AccountRepository, NewCompany, RepositoryError};
use lookup::Lookups;
use mapping::MappedRow;
use report::RowOutcome;
use schema::ColumnIndex;

pub use report::{ImportReport, RowIssue};
pub use router::{company_router, CompanyRoutesState};
pub use schema::{expected_labels, ImportColumn};

pub const DEFAULT_MAX_BYTES: usize = 1024 * 1024;
pub const DEFAULT_MAX_ROWS: usize = 2000;

const ALREADY_EXISTS: &str = "Empresa já existe";

/// Request-level ceilings applied before any row is processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportLimits {
    pub max_bytes: usize,
    pub max_rows: usize,
}

impl Default for ImportLimits {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
            max_rows: DEFAULT_MAX_ROWS,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Arquivo não enviado")]
    FileMissing,
    #[error("Arquivo excede o limite de {} MB", megabytes(.limit_bytes))]
    FileTooLarge { limit_bytes: usize },
    #[error("O arquivo precisa ter cabeçalho e ao menos uma linha de dados")]
    NoDataRows,
    #[error("O arquivo excede o limite de {limit} linhas")]
    TooManyRows { limit: usize },
    #[error("Colunas obrigatórias ausentes: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("Falha ao ler o upload: {0}")]
    Upload(#[source] MultipartError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

fn megabytes(bytes: &usize) -> String {
    let mb = *bytes as f64 / (1024.0 * 1024.0);
    if mb.fract() == 0.0 {
        format!("{mb:.0}")
    } else {
        format!("{mb:.1}")
    }
}

impl IntoResponse for ImportError {
    fn into_response(self) -> Response {
        let status = match &self {
            ImportError::Upload(err) => err.status(),
            ImportError::Repository(err) => {
                error!(error = %err, "company import failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::BAD_REQUEST,
        };

        let body = match &self {
            ImportError::MissingColumns(missing) => json!({
                "error": self.to_string(),
                "missingColumns": missing,
            }),
            _ => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

/// Drives one upload through parsing, validation and persistence.
pub struct CompanyImporter<R: ?Sized> {
    limits: ImportLimits,
    repository: Arc<R>,
}

impl<R> CompanyImporter<R>
where
    R: AccountRepository + ?Sized,
{
    pub fn new(repository: Arc<R>, limits: ImportLimits) -> Self {
        Self { limits, repository }
    }

    pub fn limits(&self) -> ImportLimits {
        self.limits
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Imports a raw upload. Bytes that are not valid UTF-8 are replaced
    /// rather than rejected.
    pub async fn import_bytes(&self, bytes: &[u8]) -> Result<ImportReport, ImportError> {
        if bytes.len() > self.limits.max_bytes {
            return Err(ImportError::FileTooLarge {
                limit_bytes: self.limits.max_bytes,
            });
        }

        let text = String::from_utf8_lossy(bytes);
        self.import_text(&text).await
    }

    pub async fn import_text(&self, text: &str) -> Result<ImportReport, ImportError> {
        let rows = parser::parse_rows(text);
        let (header, data) = match rows.split_first() {
            Some((header, data)) if !data.is_empty() => (header, data),
            _ => return Err(ImportError::NoDataRows),
        };

        if data.len() > self.limits.max_rows {
            return Err(ImportError::TooManyRows {
                limit: self.limits.max_rows,
            });
        }

        let columns = ColumnIndex::resolve(header).map_err(ImportError::MissingColumns)?;
        let lookups = Lookups::load(self.repository.as_ref()).await?;
        debug!(
            owners = lookups.owners.len(),
            teams = lookups.teams.len(),
            rows = data.len(),
            "company import lookups loaded"
        );

        let mut report = ImportReport::default();
        for (offset, row) in data.iter().enumerate() {
            let row_number = offset + 2;
            let outcome = self.process_row(&columns, &lookups, row_number, row).await;
            report = report.record(outcome);
        }

        info!(
            created = report.created,
            skipped = report.skipped,
            errors = report.errors,
            "company import finished"
        );
        Ok(report)
    }

    async fn process_row(
        &self,
        columns: &ColumnIndex,
        lookups: &Lookups,
        row_number: usize,
        row: &parser::Row,
    ) -> RowOutcome {
        match mapping::map_row(columns, lookups, row) {
            MappedRow::Blank => RowOutcome::Ignored,
            MappedRow::UnknownOwner { name, owner } => {
                warn!(row = row_number, company = %name, owner = %owner, "CS owner not found");
                let reason = if owner.is_empty() {
                    "CS Care não informado".to_string()
                } else {
                    format!("CS Care não encontrado: {owner}")
                };
                RowOutcome::Failed(RowIssue::new(row_number, name, reason))
            }
            MappedRow::Ready(company) => self.persist(row_number, company).await,
        }
    }

    async fn persist(&self, row_number: usize, company: NewCompany) -> RowOutcome {
        let name = company.name.clone();

        match self.repository.find_company_by_name(&name).await {
            Ok(Some(_)) => {
                return RowOutcome::Skipped(RowIssue::new(row_number, name, ALREADY_EXISTS));
            }
            Ok(None) => {}
            Err(err) => {
                warn!(row = row_number, company = %name, error = %err, "duplicate check failed");
                return RowOutcome::Failed(RowIssue::new(row_number, name, err.to_string()));
            }
        }

        match self.repository.insert_company(company).await {
            Ok(_) => RowOutcome::Created,
            Err(RepositoryError::Conflict(_)) => {
                RowOutcome::Skipped(RowIssue::new(row_number, name, ALREADY_EXISTS))
            }
            Err(err) => {
                warn!(row = row_number, company = %name, error = %err, "company insert failed");
                RowOutcome::Failed(RowIssue::new(row_number, name, err.to_string()))
            }
        }
    }
}
