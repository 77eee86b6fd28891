use thiserror::Error;

/// Errors that can occur while setting up a test environment.
#[derive(Error, Debug)]
pub enum TestError {
    /// Database connection or schema setup failure.
    ///
    /// Raised when the in-memory SQLite database cannot be created or a
    /// CREATE TABLE statement fails during test context construction.
    #[error(transparent)]
    Database(#[from] sea_orm::DbErr),
}
