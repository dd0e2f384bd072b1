#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// True when the database rejected `CREATE DATABASE` because the name is taken.
    pub fn is_duplicate_database(&self) -> bool {
        match self {
            AppError::Database(sqlx::Error::Database(db_err)) => {
                db_err.code().as_deref() == Some(DUPLICATE_DATABASE)
            }
            _ => false,
        }
    }
}

/// SQLSTATE for `duplicate_database`.
const DUPLICATE_DATABASE: &str = "42P04";
