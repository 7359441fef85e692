//! End-to-end exercises of the catalog store against an in-memory database,
//! walking the same flows the TUI drives: populate the catalog, loan books
//! out, move them between readers, and clean up.

use rusqlite::Connection;

use library_catalog_manager::db::{
    create_author, create_book, create_genre, create_reader, delete_author, delete_genre,
    fetch_books, fetch_reader_loans, fetch_readers, record_loan, release_loan, transfer_loan,
    update_book, StoreError,
};
use library_catalog_manager::{apply_schema, ReaderLoans};

fn catalog() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    apply_schema(&conn).unwrap();
    conn
}

fn entry_for(entries: &[ReaderLoans], reader_id: i64) -> &ReaderLoans {
    entries
        .iter()
        .find(|entry| entry.reader.id == reader_id)
        .unwrap()
}

#[test]
fn catalog_lists_books_with_resolved_names() {
    let conn = catalog();
    let poe = create_author(&conn, "A.Poe", "Boston, 1809.").unwrap();
    let horror = create_genre(&conn, "Horror").unwrap();
    create_book(&conn, "Tales", "ISBN-1", Some(poe.id), Some(horror.id)).unwrap();
    create_book(&conn, "Frankenstein", "ISBN-2", None, None).unwrap();

    let books = fetch_books(&conn).unwrap();
    assert_eq!(books.len(), 2);
    assert_eq!(books[0].author_display(), "A.Poe");
    assert_eq!(books[0].genre_display(), "Horror");
    assert_eq!(books[1].author_display(), "Unknown");
    assert_eq!(books[1].genre_display(), "Unknown");
}

#[test]
fn uniqueness_is_enforced_per_entity() {
    let conn = catalog();
    create_book(&conn, "Tales", "ISBN-1", None, None).unwrap();
    create_genre(&conn, "Horror").unwrap();
    create_reader(&conn, "Ada", "ada@example.com").unwrap();

    assert!(matches!(
        create_book(&conn, "Other", "ISBN-1", None, None).unwrap_err(),
        StoreError::Constraint(_)
    ));
    assert!(matches!(
        create_genre(&conn, "Horror").unwrap_err(),
        StoreError::Constraint(_)
    ));
    assert!(matches!(
        create_reader(&conn, "Grace", "ada@example.com").unwrap_err(),
        StoreError::Constraint(_)
    ));

    // duplicate names alone are fine; only the email must be unique
    create_reader(&conn, "Ada", "ada.l@example.com").unwrap();
    assert_eq!(fetch_readers(&conn).unwrap().len(), 2);
}

#[test]
fn loan_lifecycle_record_transfer_release() {
    let conn = catalog();
    let ada = create_reader(&conn, "Ada", "ada@example.com").unwrap();
    let grace = create_reader(&conn, "Grace", "grace@example.com").unwrap();
    let book = create_book(&conn, "Tales", "ISBN-1", None, None).unwrap();

    record_loan(&conn, book.id, ada.id).unwrap();
    let entries = fetch_reader_loans(&conn).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entry_for(&entries, ada.id).loans.len(), 1);
    assert_eq!(entry_for(&entries, ada.id).loans[0].title, "Tales");
    assert!(entry_for(&entries, grace.id).loans.is_empty());

    transfer_loan(&conn, ada.id, grace.id, book.id).unwrap();
    let entries = fetch_reader_loans(&conn).unwrap();
    assert!(entry_for(&entries, ada.id).loans.is_empty());
    assert_eq!(entry_for(&entries, grace.id).loans[0].book_id, book.id);

    release_loan(&conn, grace.id, book.id).unwrap();
    let entries = fetch_reader_loans(&conn).unwrap();
    assert!(entries.iter().all(|entry| entry.loans.is_empty()));
}

#[test]
fn same_book_may_be_loaned_to_several_readers() {
    let conn = catalog();
    let ada = create_reader(&conn, "Ada", "ada@example.com").unwrap();
    let grace = create_reader(&conn, "Grace", "grace@example.com").unwrap();
    let book = create_book(&conn, "Tales", "ISBN-1", None, None).unwrap();

    record_loan(&conn, book.id, ada.id).unwrap();
    record_loan(&conn, book.id, grace.id).unwrap();

    let entries = fetch_reader_loans(&conn).unwrap();
    assert_eq!(entry_for(&entries, ada.id).loans[0].book_id, book.id);
    assert_eq!(entry_for(&entries, grace.id).loans[0].book_id, book.id);

    // releasing one association leaves the other untouched
    release_loan(&conn, ada.id, book.id).unwrap();
    let entries = fetch_reader_loans(&conn).unwrap();
    assert!(entry_for(&entries, ada.id).loans.is_empty());
    assert_eq!(entry_for(&entries, grace.id).loans.len(), 1);
}

#[test]
fn same_titled_books_stay_distinguishable_by_id() {
    let conn = catalog();
    let ada = create_reader(&conn, "Ada", "ada@example.com").unwrap();
    let first = create_book(&conn, "Tales", "ISBN-1", None, None).unwrap();
    let second = create_book(&conn, "Tales", "ISBN-2", None, None).unwrap();

    record_loan(&conn, first.id, ada.id).unwrap();
    record_loan(&conn, second.id, ada.id).unwrap();

    // returning the second copy must not touch the first
    release_loan(&conn, ada.id, second.id).unwrap();
    let entries = fetch_reader_loans(&conn).unwrap();
    assert_eq!(entry_for(&entries, ada.id).loans.len(), 1);
    assert_eq!(entry_for(&entries, ada.id).loans[0].book_id, first.id);
}

#[test]
fn deleting_referenced_rows_never_cascades() {
    let conn = catalog();
    let poe = create_author(&conn, "A.Poe", "").unwrap();
    let horror = create_genre(&conn, "Horror").unwrap();
    let ada = create_reader(&conn, "Ada", "ada@example.com").unwrap();
    let book = create_book(&conn, "Tales", "ISBN-1", Some(poe.id), Some(horror.id)).unwrap();
    record_loan(&conn, book.id, ada.id).unwrap();

    delete_author(&conn, poe.id).unwrap();
    delete_genre(&conn, horror.id).unwrap();

    let books = fetch_books(&conn).unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].book.author_id, Some(poe.id));
    assert_eq!(books[0].author_display(), "Unknown");
    assert_eq!(books[0].genre_display(), "Unknown");

    let entries = fetch_reader_loans(&conn).unwrap();
    assert_eq!(entry_for(&entries, ada.id).loans.len(), 1);
}

#[test]
fn editing_a_book_keeps_its_loans() {
    let conn = catalog();
    let ada = create_reader(&conn, "Ada", "ada@example.com").unwrap();
    let book = create_book(&conn, "Tales", "ISBN-1", None, None).unwrap();
    record_loan(&conn, book.id, ada.id).unwrap();

    update_book(&conn, book.id, "Tales, revised", "ISBN-1R", None, None).unwrap();

    let entries = fetch_reader_loans(&conn).unwrap();
    assert_eq!(entry_for(&entries, ada.id).loans[0].title, "Tales, revised");
}
