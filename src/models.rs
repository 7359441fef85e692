//! Domain models that mirror the SQLite schema and get passed throughout the
//! TUI. The intent is that these types stay light-weight data holders so other
//! layers can focus on presentation and persistence logic.

use std::fmt;

#[derive(Debug, Clone)]
/// One catalog entry. Author and genre references are optional and may point
/// at rows that no longer exist; the store never rewrites them behind the
/// caller's back, so a stale id survives until the user edits the book.
pub struct Book {
    /// Primary key from the database. Edit/delete flows bubble the id back to
    /// the persistence layer.
    pub id: i64,
    /// Title displayed in lists and in the loan pickers.
    pub title: String,
    /// International Standard Book Number, unique across the catalog.
    pub isbn: String,
    /// Optional reference into the `authors` table.
    pub author_id: Option<i64>,
    /// Optional reference into the `genres` table.
    pub genre_id: Option<i64>,
}

/// A book joined with the display names of its author and genre. The names
/// come from a LEFT JOIN, so a dangling reference simply yields `None` here
/// while the id stays intact on the inner [`Book`].
#[derive(Debug, Clone)]
pub struct BookRow {
    pub book: Book,
    pub author_name: Option<String>,
    pub genre_name: Option<String>,
}

impl BookRow {
    /// Author name ready for display, with a placeholder for missing or
    /// dangling references.
    pub fn author_display(&self) -> &str {
        self.author_name.as_deref().unwrap_or("Unknown")
    }

    /// Genre name ready for display.
    pub fn genre_display(&self) -> &str {
        self.genre_name.as_deref().unwrap_or("Unknown")
    }
}

#[derive(Debug, Clone)]
/// A person who wrote zero or more books in the catalog.
pub struct Author {
    pub id: i64,
    pub name: String,
    /// Free-form text, may be empty.
    pub biography: String,
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Debug, Clone)]
/// A category entity. Names are unique across the catalog.
pub struct Genre {
    pub id: i64,
    pub name: String,
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Debug, Clone)]
/// A patron who may hold zero or more books on loan.
pub struct Reader {
    pub id: i64,
    pub name: String,
    /// Contact address, unique across all readers.
    pub email: String,
}

impl fmt::Display for Reader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// One side of a loan association as seen from the reader: which book is out
/// and since when. The `(reader id, book id)` pair is the association's
/// identity; there is no separate loan id.
#[derive(Debug, Clone)]
pub struct LoanedBook {
    pub book_id: i64,
    pub title: String,
    /// ISO date (`YYYY-MM-DD`) recorded when the association row was written.
    pub loaned_on: String,
}

/// A reader together with every book currently out to them. Readers with no
/// loans still get an entry with an empty list so the loans screen can show
/// the whole patron roster.
#[derive(Debug, Clone)]
pub struct ReaderLoans {
    pub reader: Reader,
    pub loans: Vec<LoanedBook>,
}
