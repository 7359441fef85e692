//! Persistence module split across logical submodules, one per entity.

pub(crate) mod authors;
pub(crate) mod books;
mod connection;
mod error;
pub(crate) mod genres;
pub(crate) mod loans;
pub(crate) mod readers;

pub use authors::{create_author, delete_author, fetch_authors, update_author};
pub use books::{create_book, delete_book, fetch_books, update_book};
pub use connection::{apply_schema, ensure_schema};
pub use error::{StoreError, StoreResult};
pub use genres::{create_genre, delete_genre, fetch_genres, update_genre};
pub use loans::{fetch_reader_loans, record_loan, release_loan, transfer_loan};
pub use readers::{create_reader, delete_reader, fetch_readers, update_reader};
