use serde::{Deserialize, Serialize};

/// One row that was skipped or failed, numbered as in the spreadsheet
/// (the header is row 1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowIssue {
    pub row: usize,
    pub name: String,
    pub reason: String,
}

impl RowIssue {
    pub fn new(row: usize, name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            row,
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// What happened to a single data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RowOutcome {
    /// Blank company name; nothing to import and nothing to report.
    Ignored,
    Created,
    Skipped(RowIssue),
    Failed(RowIssue),
}

/// Aggregate outcome returned to the uploader.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub created: usize,
    pub skipped: usize,
    pub errors: usize,
    pub skipped_details: Vec<RowIssue>,
    pub error_details: Vec<RowIssue>,
}

impl ImportReport {
    pub(crate) fn record(mut self, outcome: RowOutcome) -> Self {
        match outcome {
            RowOutcome::Ignored => {}
            RowOutcome::Created => self.created += 1,
            RowOutcome::Skipped(issue) => {
                self.skipped += 1;
                self.skipped_details.push(issue);
            }
            RowOutcome::Failed(issue) => {
                self.errors += 1;
                self.error_details.push(issue);
            }
        }
        self
    }

    pub fn processed(&self) -> usize {
        self.created + self.skipped + self.errors
    }
}
