use database::DatabaseError;
use thiserror::Error;
use types::UserRole;

use crate::forms::FormErrors;

#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Sign in first (use --as <email>)")]
    NotAuthenticated,

    #[error("A {role} account may not {action}")]
    Forbidden { role: UserRole, action: String },

    #[error("Form has errors: {0}")]
    Validation(FormErrors),

    #[error("Email already in use: {0}")]
    EmailTaken(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<FormErrors> for ConsoleError {
    fn from(errors: FormErrors) -> Self {
        ConsoleError::Validation(errors)
    }
}

impl ConsoleError {
    pub(crate) fn not_found(kind: &'static str, id: impl ToString) -> Self {
        ConsoleError::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}
