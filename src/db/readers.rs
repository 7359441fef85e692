use rusqlite::{params, Connection};

use crate::models::Reader;

use super::error::{map_constraint, StoreError, StoreResult};

/// Retrieve every reader in insertion order. Feeds the Readers screen and the
/// reader pickers on the loan flows.
pub fn fetch_readers(conn: &Connection) -> StoreResult<Vec<Reader>> {
    let mut stmt = conn.prepare("SELECT id, name, email FROM readers ORDER BY id")?;

    let readers = stmt
        .query_map([], |row| {
            Ok(Reader {
                id: row.get(0)?,
                name: row.get(1)?,
                email: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(readers)
}

/// Insert a new reader. Emails are unique across the catalog.
pub fn create_reader(conn: &Connection, name: &str, email: &str) -> StoreResult<Reader> {
    conn.execute(
        "INSERT INTO readers (name, email) VALUES (?1, ?2)",
        params![name, email],
    )
    .map_err(|err| map_constraint(err, format!("A reader with email {email} already exists.")))?;

    Ok(Reader {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
        email: email.to_string(),
    })
}

/// Overwrite both fields of an existing reader.
pub fn update_reader(conn: &Connection, id: i64, name: &str, email: &str) -> StoreResult<()> {
    let updated = conn
        .execute(
            "UPDATE readers SET name = ?1, email = ?2 WHERE id = ?3",
            params![name, email, id],
        )
        .map_err(|err| {
            map_constraint(err, format!("A reader with email {email} already exists."))
        })?;

    if updated == 0 {
        Err(StoreError::NotFound("Reader"))
    } else {
        Ok(())
    }
}

/// Remove a reader row. Any loan rows for the reader are left behind, same as
/// every other delete in the store.
pub fn delete_reader(conn: &Connection, id: i64) -> StoreResult<()> {
    let deleted = conn.execute("DELETE FROM readers WHERE id = ?1", params![id])?;

    if deleted == 0 {
        Err(StoreError::NotFound("Reader"))
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
    fn duplicate_email_fails() {
        let conn = conn();
        create_reader(&conn, "Ada", "ada@example.com").unwrap();

        let err = create_reader(&conn, "Grace", "ada@example.com").unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));

        let readers = fetch_readers(&conn).unwrap();
        assert_eq!(readers.len(), 1);
        assert_eq!(readers[0].name, "Ada");
    }

    #[test]
    fn update_changes_both_fields() {
        let conn = conn();
        let ada = create_reader(&conn, "Ada", "ada@example.com").unwrap();
        update_reader(&conn, ada.id, "Ada L.", "lovelace@example.com").unwrap();

        let readers = fetch_readers(&conn).unwrap();
        assert_eq!(readers[0].name, "Ada L.");
        assert_eq!(readers[0].email, "lovelace@example.com");
    }
}
