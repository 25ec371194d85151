use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Query execution error: {0}")]
    Query(String),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Transaction error: {0}")]
    Transaction(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid {table} record {id}: {reason}")]
    InvalidRecord {
        table: &'static str,
        id: String,
        reason: String,
    },

    #[error("Retry exhausted: {0}")]
    RetryExhausted(String),
}

impl DatabaseError {
    pub(crate) fn invalid(table: &'static str, id: &str, reason: impl Into<String>) -> Self {
        DatabaseError::InvalidRecord {
            table,
            id: id.to_string(),
            reason: reason.into(),
        }
    }
}
