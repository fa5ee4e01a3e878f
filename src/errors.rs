use thiserror::Error;

/// Errors produced by the personnel transfer backend.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or out-of-range input (unknown type code, missing target department, ...)
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// What was wrong with the input
        message: String,
    },

    /// A referenced employee, department, transfer or user does not exist
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of record that was looked up
        entity: &'static str,
        /// Identifier that failed to resolve
        id: String,
    },

    /// The operation is not valid for the record's current state
    #[error("Invalid state: {message}")]
    InvalidState {
        /// Description of the state violation
        message: String,
    },

    /// A unique business key is already taken
    #[error("Conflict: {message}")]
    Conflict {
        /// Description of the clashing key
        message: String,
    },

    /// Credentials or token were rejected
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Reason shown to the caller
        message: String,
    },

    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration problem
        message: String,
    },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {message}")]
    Internal {
        /// Description of the failure
        message: String,
    },
}

impl Error {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub(crate) fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub(crate) fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
