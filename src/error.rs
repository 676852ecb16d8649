use thiserror::Error;

pub type ArResult<T> = Result<T, ArError>;

#[derive(Error, Debug)]
pub enum ArError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Import error: {0}")]
    Import(String),

    #[error("Sheet '{sheet}' not found (available: {})", .available.join(", "))]
    SheetNotFound {
        sheet: String,
        available: Vec<String>,
    },

    #[error("{table} is missing required columns: {}", .missing.join(", "))]
    MissingColumns { table: String, missing: Vec<String> },

    #[error("No company column found: {0}")]
    NoCompanyColumn(String),

    #[error("No companies found in the ledger's data rows")]
    EmptyCatalog,

    #[error("Company '{0}' is not in the ledger")]
    UnknownCompany(String),

    #[error("No records for company {0}")]
    NoRecordsForCompany(String),

    #[error("Sum of '{bucket}' for owner '{owner}' exceeds the decimal range")]
    AmountOverflow { owner: String, bucket: String },

    #[error("Selection error: {0}")]
    Selection(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coarse classification used for exit codes and reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input could not be read at all
    Input,
    /// Input was read but does not satisfy the ledger contract
    Validation,
    /// Interactive confirmation was rejected
    Selection,
    /// Processing succeeded but the result could not be persisted
    Export,
}

impl ArError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ArError::Io(_) | ArError::Import(_) | ArError::SheetNotFound { .. } => {
                ErrorKind::Input
            }
            ArError::MissingColumns { .. }
            | ArError::NoCompanyColumn(_)
            | ArError::EmptyCatalog
            | ArError::UnknownCompany(_)
            | ArError::NoRecordsForCompany(_)
            | ArError::AmountOverflow { .. } => ErrorKind::Validation,
            ArError::Selection(_) => ErrorKind::Selection,
            ArError::Export(_) | ArError::Json(_) => ErrorKind::Export,
        }
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self.kind() {
            ErrorKind::Input | ErrorKind::Validation => 2,
            ErrorKind::Export => 3,
            ErrorKind::Selection => 1,
        }
    }
}
