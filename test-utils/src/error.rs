use thiserror::Error;

/// Errors that can occur while preparing a test environment.
#[derive(Error, Debug)]
pub enum TestError {
    /// In-memory database connection, schema creation or session table migration failed.
    #[error(transparent)]
    Database(#[from] sea_orm::DbErr),
}
