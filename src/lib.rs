//! Core library surface for the Library Catalog Manager TUI application.
//!
//! The public modules exposed here provide an intentionally small API so the
//! `bin` target as well as potential external tooling can reuse the same
//! pieces: the SQLite-backed catalog store, the domain models, and the
//! interactive application.
pub mod db;
pub mod models;
pub mod ui;

/// Convenience re-exports for the persistence layer. `ensure_schema` is what
/// `main.rs` calls to bring up the embedded SQLite store; `apply_schema` lets
/// tests run the same DDL against an in-memory connection.
pub use db::{apply_schema, ensure_schema, StoreError};

/// The domain types that other layers manipulate.
pub use models::{Author, Book, BookRow, Genre, LoanedBook, Reader, ReaderLoans};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
