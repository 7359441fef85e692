use rusqlite::{params, Connection};

use crate::models::Author;

use super::error::{StoreError, StoreResult};

/// Retrieve every author in insertion order. The same list feeds both the
/// Authors screen and the author picker on the book form.
pub fn fetch_authors(conn: &Connection) -> StoreResult<Vec<Author>> {
    let mut stmt = conn.prepare("SELECT id, name, biography FROM authors ORDER BY id")?;

    let authors = stmt
        .query_map([], |row| {
            Ok(Author {
                id: row.get(0)?,
                name: row.get(1)?,
                biography: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(authors)
}

/// Insert a new author. Biography may be blank.
pub fn create_author(conn: &Connection, name: &str, biography: &str) -> StoreResult<Author> {
    conn.execute(
        "INSERT INTO authors (name, biography) VALUES (?1, ?2)",
        params![name, biography],
    )?;

    Ok(Author {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
        biography: biography.to_string(),
    })
}

/// Overwrite both fields of an existing author.
pub fn update_author(conn: &Connection, id: i64, name: &str, biography: &str) -> StoreResult<()> {
    let updated = conn.execute(
        "UPDATE authors SET name = ?1, biography = ?2 WHERE id = ?3",
        params![name, biography, id],
    )?;

    if updated == 0 {
        Err(StoreError::NotFound("Author"))
    } else {
        Ok(())
    }
}

/// Remove an author row. Books referencing the author keep their stale id;
/// the catalog never cascades.
pub fn delete_author(conn: &Connection, id: i64) -> StoreResult<()> {
    let deleted = conn.execute("DELETE FROM authors WHERE id = ?1", params![id])?;

    if deleted == 0 {
        Err(StoreError::NotFound("Author"))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::apply_schema;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();
        conn
    }

    #[test]
    fn create_and_fetch_round_trip() {
        let conn = conn();
        create_author(&conn, "A.Poe", "Boston, 1809").unwrap();

        let authors = fetch_authors(&conn).unwrap();
        assert_eq!(authors.len(), 1);
        assert_eq!(authors[0].name, "A.Poe");
        assert_eq!(authors[0].biography, "Boston, 1809");
    }

    #[test]
    fn delete_missing_author_reports_not_found() {
        let conn = conn();
        let err = delete_author(&conn, 7).unwrap_err();
        assert!(matches!(err, StoreError::NotFound("Author")));
    }
}
