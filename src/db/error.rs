use rusqlite::{Error as SqlError, ErrorCode};
use thiserror::Error;

/// Errors surfaced by the catalog store. The UI cares about three shapes:
/// uniqueness violations it should explain, lookups that matched nothing, and
/// everything else from SQLite.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness invariant (ISBN, genre name, reader email, loan pair) was
    /// violated. The message already names the offending value.
    #[error("{0}")]
    Constraint(String),
    /// The targeted row does not exist. Update/delete by id and all loan
    /// operations report this explicitly instead of silently doing nothing.
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error(transparent)]
    Sqlite(#[from] SqlError),
}

/// Shorthand for store-layer results.
pub type StoreResult<T> = Result<T, StoreError>;

/// Coerce a SQLite constraint failure into a human-readable message, leaving
/// any other error untouched. Each store module supplies the message that
/// names its own unique column.
pub(crate) fn map_constraint(err: SqlError, message: impl Into<String>) -> StoreError {
    if matches!(err.sqlite_error_code(), Some(ErrorCode::ConstraintViolation)) {
        StoreError::Constraint(message.into())
    } else {
        StoreError::Sqlite(err)
    }
}
