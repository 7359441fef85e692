use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;
use rusqlite::Connection;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".library-catalog-manager";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "catalog.sqlite";

/// Ensure the database file exists, run lazy migrations, and return a live
/// connection. Failing here is the only startup-fatal condition, so every
/// step carries enough context to explain itself on the terminal.
pub fn ensure_schema() -> Result<Connection> {
    let db_path = db_path()?;

    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent).context("failed to create data directory")?;
    }

    let conn = Connection::open(&db_path).context("failed to open SQLite database")?;
    apply_schema(&conn)?;
    Ok(conn)
}

/// Create the five catalog tables if they are missing. Public so tests and
/// embedding tools can run the same schema against an in-memory connection.
///
/// The schema deliberately declares no FOREIGN KEY clauses: deleting an
/// author, genre, book, or reader must never cascade, and a book is allowed
/// to keep a stale `author_id`/`genre_id` until the user edits it.
pub fn apply_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS books (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            isbn TEXT NOT NULL UNIQUE,
            author_id INTEGER,
            genre_id INTEGER
        )",
        [],
    )
    .context("failed to create books table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS authors (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            biography TEXT
        )",
        [],
    )
    .context("failed to create authors table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS genres (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE
        )",
        [],
    )
    .context("failed to create genres table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS readers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE
        )",
        [],
    )
    .context("failed to create readers table")?;

    // The loan date is written per row at insert time; the pair itself is the
    // association's identity.
    conn.execute(
        "CREATE TABLE IF NOT EXISTS loans (
            reader_id INTEGER NOT NULL,
            book_id INTEGER NOT NULL,
            loaned_on TEXT NOT NULL,
            PRIMARY KEY (reader_id, book_id)
        )",
        [],
    )
    .context("failed to create loans table")?;

    Ok(())
}

/// Resolve the absolute path to the SQLite database inside the user's home.
fn db_path() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME).join(DB_FILE_NAME))
}
