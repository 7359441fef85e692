use rusqlite::{params, Connection, OptionalExtension};

use crate::models::{LoanedBook, Reader, ReaderLoans};

use super::error::{map_constraint, StoreError, StoreResult};

/// Record a checkout: the book joins the reader's loaned set with today's
/// date. Both rows are verified first so a bad id surfaces as an error rather
/// than a silent no-op, and the `(reader, book)` primary key guarantees that
/// re-recording an existing pair never duplicates the association.
pub fn record_loan(conn: &Connection, book_id: i64, reader_id: i64) -> StoreResult<()> {
    if !reader_exists(conn, reader_id)? {
        return Err(StoreError::NotFound("Reader"));
    }
    if !book_exists(conn, book_id)? {
        return Err(StoreError::NotFound("Book"));
    }

    conn.execute(
        "INSERT INTO loans (reader_id, book_id, loaned_on) VALUES (?1, ?2, date('now'))",
        params![reader_id, book_id],
    )
    .map_err(|err| map_constraint(err, "That book is already on loan to this reader."))?;

    Ok(())
}

/// Every reader with their currently loaned books. Readers holding nothing
/// still appear with an empty list, so the loans screen doubles as a patron
/// roster. A loan whose book row was deleted keeps its entry with a
/// placeholder title; the association outlives the book on purpose.
pub fn fetch_reader_loans(conn: &Connection) -> StoreResult<Vec<ReaderLoans>> {
    let mut stmt = conn.prepare(
        "SELECT r.id, r.name, r.email, l.book_id, b.title, l.loaned_on
         FROM readers r
         LEFT JOIN loans l ON l.reader_id = r.id
         LEFT JOIN books b ON b.id = l.book_id
         ORDER BY r.id, l.loaned_on, l.book_id",
    )?;

    let mut rows = stmt.query([])?;
    let mut result: Vec<ReaderLoans> = Vec::new();

    while let Some(row) = rows.next()? {
        let reader_id: i64 = row.get(0)?;
        if result.last().map(|entry| entry.reader.id) != Some(reader_id) {
            result.push(ReaderLoans {
                reader: Reader {
                    id: reader_id,
                    name: row.get(1)?,
                    email: row.get(2)?,
                },
                loans: Vec::new(),
            });
        }

        if let Some(book_id) = row.get::<_, Option<i64>>(3)? {
            let title: Option<String> = row.get(4)?;
            if let Some(entry) = result.last_mut() {
                entry.loans.push(LoanedBook {
                    book_id,
                    title: title.unwrap_or_else(|| format!("Unknown (book #{book_id})")),
                    loaned_on: row.get(5)?,
                });
            }
        }
    }

    Ok(result)
}

/// Return a book: the association row is deleted outright, keeping no
/// history. A pair that was never on loan is an explicit error.
pub fn release_loan(conn: &Connection, reader_id: i64, book_id: i64) -> StoreResult<()> {
    let deleted = conn.execute(
        "DELETE FROM loans WHERE reader_id = ?1 AND book_id = ?2",
        params![reader_id, book_id],
    )?;

    if deleted == 0 {
        Err(StoreError::NotFound("Loan"))
    } else {
        Ok(())
    }
}

/// Move a loan from one reader to another in a single statement, which makes
/// the operation atomic without an explicit transaction. The date is
/// refreshed because the new reader's loan starts now. If the book is not on
/// loan to the old reader, nothing changes and the caller is told so.
pub fn transfer_loan(
    conn: &Connection,
    reader_id: i64,
    new_reader_id: i64,
    book_id: i64,
) -> StoreResult<()> {
    if !reader_exists(conn, new_reader_id)? {
        return Err(StoreError::NotFound("Reader"));
    }

    let updated = conn
        .execute(
            "UPDATE loans SET reader_id = ?1, loaned_on = date('now')
             WHERE reader_id = ?2 AND book_id = ?3",
            params![new_reader_id, reader_id, book_id],
        )
        .map_err(|err| {
            map_constraint(err, "That book is already on loan to the chosen reader.")
        })?;

    if updated == 0 {
        Err(StoreError::NotFound("Loan"))
    } else {
        Ok(())
    }
}

fn reader_exists(conn: &Connection, id: i64) -> StoreResult<bool> {
    let found = conn
        .query_row("SELECT 1 FROM readers WHERE id = ?1", params![id], |_| {
            Ok(())
        })
        .optional()?;
    Ok(found.is_some())
}

fn book_exists(conn: &Connection, id: i64) -> StoreResult<bool> {
    let found = conn
        .query_row("SELECT 1 FROM books WHERE id = ?1", params![id], |_| Ok(()))
        .optional()?;
    Ok(found.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::apply_schema;
    use crate::db::books::create_book;
    use crate::db::readers::create_reader;
    use crate::models::{Book, Reader};

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();
        conn
    }

    fn seed(conn: &Connection) -> (Reader, Book) {
        let reader = create_reader(conn, "Ada", "ada@example.com").unwrap();
        let book = create_book(conn, "Tales", "ISBN-1", None, None).unwrap();
        (reader, book)
    }

    fn loans_of(conn: &Connection, reader_id: i64) -> Vec<i64> {
        fetch_reader_loans(conn)
            .unwrap()
            .into_iter()
            .find(|entry| entry.reader.id == reader_id)
            .map(|entry| entry.loans.iter().map(|loan| loan.book_id).collect())
            .unwrap()
    }

    #[test]
    fn recorded_loan_shows_up_exactly_once() {
        let conn = conn();
        let (reader, book) = seed(&conn);

        record_loan(&conn, book.id, reader.id).unwrap();
        assert_eq!(loans_of(&conn, reader.id), vec![book.id]);

        let err = record_loan(&conn, book.id, reader.id).unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));
        assert_eq!(loans_of(&conn, reader.id), vec![book.id]);
    }

    #[test]
    fn loan_date_is_set_at_insert_time() {
        let conn = conn();
        let (reader, book) = seed(&conn);
        record_loan(&conn, book.id, reader.id).unwrap();

        let entries = fetch_reader_loans(&conn).unwrap();
        let loaned_on = &entries[0].loans[0].loaned_on;
        // date('now') yields ISO YYYY-MM-DD
        assert_eq!(loaned_on.len(), 10);
        assert!(loaned_on.chars().next().unwrap().is_ascii_digit());
    }

    #[test]
    fn missing_reader_or_book_is_an_explicit_error() {
        let conn = conn();
        let (reader, book) = seed(&conn);

        assert!(matches!(
            record_loan(&conn, book.id, 999).unwrap_err(),
            StoreError::NotFound("Reader")
        ));
        assert!(matches!(
            record_loan(&conn, 999, reader.id).unwrap_err(),
            StoreError::NotFound("Book")
        ));
        assert!(loans_of(&conn, reader.id).is_empty());
    }

    #[test]
    fn reader_without_loans_still_listed() {
        let conn = conn();
        let (reader, _) = seed(&conn);

        let entries = fetch_reader_loans(&conn).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].reader.id, reader.id);
        assert!(entries[0].loans.is_empty());
    }

    #[test]
    fn release_removes_the_association() {
        let conn = conn();
        let (reader, book) = seed(&conn);
        record_loan(&conn, book.id, reader.id).unwrap();

        release_loan(&conn, reader.id, book.id).unwrap();
        assert!(loans_of(&conn, reader.id).is_empty());

        let err = release_loan(&conn, reader.id, book.id).unwrap_err();
        assert!(matches!(err, StoreError::NotFound("Loan")));
    }

    #[test]
    fn transfer_moves_the_book_between_readers() {
        let conn = conn();
        let (ada, book) = seed(&conn);
        let grace = create_reader(&conn, "Grace", "grace@example.com").unwrap();
        record_loan(&conn, book.id, ada.id).unwrap();

        transfer_loan(&conn, ada.id, grace.id, book.id).unwrap();
        assert!(loans_of(&conn, ada.id).is_empty());
        assert_eq!(loans_of(&conn, grace.id), vec![book.id]);
    }

    #[test]
    fn transfer_of_unloaned_book_changes_nothing() {
        let conn = conn();
        let (ada, book) = seed(&conn);
        let grace = create_reader(&conn, "Grace", "grace@example.com").unwrap();

        let err = transfer_loan(&conn, ada.id, grace.id, book.id).unwrap_err();
        assert!(matches!(err, StoreError::NotFound("Loan")));
        assert!(loans_of(&conn, ada.id).is_empty());
        assert!(loans_of(&conn, grace.id).is_empty());
    }

    #[test]
    fn transfer_onto_holder_of_same_book_is_a_constraint_error() {
        let conn = conn();
        let (ada, book) = seed(&conn);
        let grace = create_reader(&conn, "Grace", "grace@example.com").unwrap();
        record_loan(&conn, book.id, ada.id).unwrap();
        record_loan(&conn, book.id, grace.id).unwrap();

        let err = transfer_loan(&conn, ada.id, grace.id, book.id).unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));
        assert_eq!(loans_of(&conn, ada.id), vec![book.id]);
    }

    #[test]
    fn deleting_a_loaned_book_keeps_the_association() {
        let conn = conn();
        let (reader, book) = seed(&conn);
        record_loan(&conn, book.id, reader.id).unwrap();
        crate::db::books::delete_book(&conn, book.id).unwrap();

        let entries = fetch_reader_loans(&conn).unwrap();
        assert_eq!(entries[0].loans.len(), 1);
        assert!(entries[0].loans[0].title.starts_with("Unknown"));
    }
}
