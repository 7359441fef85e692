use rusqlite::{params, Connection};

use crate::models::{Book, BookRow};

use super::error::{map_constraint, StoreError, StoreResult};

/// Retrieve every book in insertion order, with author and genre names
/// resolved through LEFT JOINs. A dangling reference keeps its id on the book
/// but yields no name, which the UI renders as "Unknown".
pub fn fetch_books(conn: &Connection) -> StoreResult<Vec<BookRow>> {
    let mut stmt = conn.prepare(
        "SELECT b.id, b.title, b.isbn, b.author_id, b.genre_id, a.name, g.name
         FROM books b
         LEFT JOIN authors a ON a.id = b.author_id
         LEFT JOIN genres g ON g.id = b.genre_id
         ORDER BY b.id",
    )?;

    let rows = stmt
        .query_map([], |row| {
            Ok(BookRow {
                book: Book {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    isbn: row.get(2)?,
                    author_id: row.get(3)?,
                    genre_id: row.get(4)?,
                },
                author_name: row.get(5)?,
                genre_name: row.get(6)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Insert a new book, returning the hydrated struct so the caller can refresh
/// its list without a second query round-trip.
pub fn create_book(
    conn: &Connection,
    title: &str,
    isbn: &str,
    author_id: Option<i64>,
    genre_id: Option<i64>,
) -> StoreResult<Book> {
    conn.execute(
        "INSERT INTO books (title, isbn, author_id, genre_id) VALUES (?1, ?2, ?3, ?4)",
        params![title, isbn, author_id, genre_id],
    )
    .map_err(|err| map_constraint(err, format!("ISBN {isbn} is already in the catalog.")))?;

    Ok(Book {
        id: conn.last_insert_rowid(),
        title: title.to_string(),
        isbn: isbn.to_string(),
        author_id,
        genre_id,
    })
}

/// Overwrite every editable field of an existing book. Zero rows touched is
/// an explicit error so the UI can tell the user instead of silently
/// continuing.
pub fn update_book(
    conn: &Connection,
    id: i64,
    title: &str,
    isbn: &str,
    author_id: Option<i64>,
    genre_id: Option<i64>,
) -> StoreResult<()> {
    let updated = conn
        .execute(
            "UPDATE books SET title = ?1, isbn = ?2, author_id = ?3, genre_id = ?4 WHERE id = ?5",
            params![title, isbn, author_id, genre_id, id],
        )
        .map_err(|err| map_constraint(err, format!("ISBN {isbn} is already in the catalog.")))?;

    if updated == 0 {
        Err(StoreError::NotFound("Book"))
    } else {
        Ok(())
    }
}

/// Remove a book row. Loan associations referencing the book are left in
/// place; returning a book and deleting it are independent operations.
pub fn delete_book(conn: &Connection, id: i64) -> StoreResult<()> {
    let deleted = conn.execute("DELETE FROM books WHERE id = ?1", params![id])?;

    if deleted == 0 {
        Err(StoreError::NotFound("Book"))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::apply_schema;
    use crate::db::authors::create_author;
    use crate::db::genres::create_genre;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();
        conn
    }

    #[test]
    fn duplicate_isbn_fails_and_keeps_first_row() {
        let conn = conn();
        create_book(&conn, "Tales", "ISBN-1", None, None).unwrap();

        let err = create_book(&conn, "Other", "ISBN-1", None, None).unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));

        let books = fetch_books(&conn).unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].book.title, "Tales");
    }

    #[test]
    fn fetch_resolves_author_and_genre_names() {
        let conn = conn();
        let poe = create_author(&conn, "A.Poe", "").unwrap();
        let horror = create_genre(&conn, "Horror").unwrap();
        create_book(&conn, "Tales", "ISBN-1", Some(poe.id), Some(horror.id)).unwrap();

        let books = fetch_books(&conn).unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].author_display(), "A.Poe");
        assert_eq!(books[0].genre_display(), "Horror");
    }

    #[test]
    fn dangling_author_reference_survives_with_no_name() {
        let conn = conn();
        let poe = create_author(&conn, "A.Poe", "").unwrap();
        create_book(&conn, "Tales", "ISBN-1", Some(poe.id), None).unwrap();
        crate::db::authors::delete_author(&conn, poe.id).unwrap();

        let books = fetch_books(&conn).unwrap();
        assert_eq!(books[0].book.author_id, Some(poe.id));
        assert_eq!(books[0].author_name, None);
        assert_eq!(books[0].author_display(), "Unknown");
    }

    #[test]
    fn update_missing_book_reports_not_found() {
        let conn = conn();
        let err = update_book(&conn, 42, "T", "I", None, None).unwrap_err();
        assert!(matches!(err, StoreError::NotFound("Book")));
    }

    #[test]
    fn update_replaces_every_field() {
        let conn = conn();
        let book = create_book(&conn, "Tales", "ISBN-1", None, None).unwrap();
        update_book(&conn, book.id, "Tales II", "ISBN-2", None, None).unwrap();

        let books = fetch_books(&conn).unwrap();
        assert_eq!(books[0].book.title, "Tales II");
        assert_eq!(books[0].book.isbn, "ISBN-2");
    }
}
