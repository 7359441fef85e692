use rusqlite::{params, Connection};

use crate::models::Genre;

use super::error::{map_constraint, StoreError, StoreResult};

/// Retrieve every genre in insertion order.
pub fn fetch_genres(conn: &Connection) -> StoreResult<Vec<Genre>> {
    let mut stmt = conn.prepare("SELECT id, name FROM genres ORDER BY id")?;

    let genres = stmt
        .query_map([], |row| {
            Ok(Genre {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(genres)
}

/// Insert a new genre. Names are unique across the catalog.
pub fn create_genre(conn: &Connection, name: &str) -> StoreResult<Genre> {
    conn.execute("INSERT INTO genres (name) VALUES (?1)", params![name])
        .map_err(|err| map_constraint(err, format!("Genre \"{name}\" already exists.")))?;

    Ok(Genre {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
    })
}

/// Rename an existing genre, subject to the same uniqueness rule.
pub fn update_genre(conn: &Connection, id: i64, name: &str) -> StoreResult<()> {
    let updated = conn
        .execute(
            "UPDATE genres SET name = ?1 WHERE id = ?2",
            params![name, id],
        )
        .map_err(|err| map_constraint(err, format!("Genre \"{name}\" already exists.")))?;

    if updated == 0 {
        Err(StoreError::NotFound("Genre"))
    } else {
        Ok(())
    }
}

/// Remove a genre row. Books referencing it keep their stale id.
pub fn delete_genre(conn: &Connection, id: i64) -> StoreResult<()> {
    let deleted = conn.execute("DELETE FROM genres WHERE id = ?1", params![id])?;

    if deleted == 0 {
        Err(StoreError::NotFound("Genre"))
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
    fn duplicate_name_fails_with_one_row_remaining() {
        let conn = conn();
        create_genre(&conn, "Fiction").unwrap();

        let err = create_genre(&conn, "Fiction").unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));
        assert!(err.to_string().contains("Fiction"));

        let genres = fetch_genres(&conn).unwrap();
        assert_eq!(genres.len(), 1);
    }

    #[test]
    fn rename_onto_existing_name_fails() {
        let conn = conn();
        create_genre(&conn, "Fiction").unwrap();
        let horror = create_genre(&conn, "Horror").unwrap();

        let err = update_genre(&conn, horror.id, "Fiction").unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));
    }
}
