use contracts::shared::processor::FieldErrorEntry;
use sea_orm::{DbErr, RuntimeErr};
use std::panic::Location;

/// Errors of the domain layer and of processors
#[derive(Debug, thiserror::Error)]
pub enum ProcessorError {
    /// Input broke a business rule; nothing was written
    #[error("Validation failed: {}", format_field_errors(.0))]
    Validation(Vec<FieldErrorEntry>),

    #[error("Object not found")]
    NotFound,

    #[error("Access denied: {0}")]
    PermissionDenied(String),

    /// The write call reported failure without raising a storage error.
    /// `detail` is shown to the caller when the failure has anything to report.
    #[error("Persistence failed: {}", .detail.as_deref().unwrap_or("no details"))]
    Persistence { detail: Option<String> },

    #[error("SQL Error ({code}): {message}")]
    Storage { code: String, message: String },

    #[error("{message} ({location})")]
    Unexpected { message: String, location: String },
}

impl ProcessorError {
    pub fn validation(field: &str, msg: impl Into<String>) -> Self {
        ProcessorError::Validation(vec![FieldErrorEntry::new(field, msg)])
    }

    /// Unexpected failure, tagged with the `file:line` of the caller
    #[track_caller]
    pub fn unexpected(message: impl Into<String>) -> Self {
        let caller = Location::caller();
        ProcessorError::Unexpected {
            message: message.into(),
            location: format!("{}:{}", caller.file(), caller.line()),
        }
    }

    pub fn field_errors(&self) -> &[FieldErrorEntry] {
        match self {
            ProcessorError::Validation(errors) => errors,
            _ => &[],
        }
    }
}

impl From<DbErr> for ProcessorError {
    fn from(err: DbErr) -> Self {
        ProcessorError::Storage {
            code: sql_error_code(&err).unwrap_or_else(|| "n/a".to_string()),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ProcessorError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        ProcessorError::unexpected(format!("Serialization failed: {}", err))
    }
}

fn format_field_errors(errors: &[FieldErrorEntry]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.id, e.msg))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Database-reported error code (SQLSTATE or SQLite extended code), when there is one
pub fn sql_error_code(err: &DbErr) -> Option<String> {
    let runtime = match err {
        DbErr::Conn(e) | DbErr::Exec(e) | DbErr::Query(e) => e,
        _ => return None,
    };
    match runtime {
        RuntimeErr::SqlxError(sqlx::Error::Database(db_err)) => {
            db_err.code().map(|c| c.into_owned())
        }
        _ => None,
    }
}
