use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("No database driver for connection URL scheme: {0}")]
    UnsupportedDriver(String),

    #[error("Invalid connection URL: {0}")]
    InvalidUrl(String),

    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Query execution error: {0}")]
    Query(String),

    #[error("Schema creation error: {0}")]
    Schema(String),

    #[error("Field `{field}` is {len} characters, limit is {max}")]
    FieldTooLong {
        field: &'static str,
        max: usize,
        len: usize,
    },

    #[error("Connection pool is closed")]
    Closed,
}

impl StoreError {
    /// Maps a per-operation sqlx error, keeping pool shutdown distinguishable.
    pub(crate) fn query(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolClosed => StoreError::Closed,
            other => StoreError::Query(other.to_string()),
        }
    }
}
