//! Schema creation and version bookkeeping.
//!
//! # Responsibility
//! - Create the `pets` table on a fresh database.
//! - Run the upgrade hook when an older version is found.
//!
//! # Invariants
//! - `ensure_schema` is idempotent; repeated calls never touch existing rows.
//! - The upgrade hook leaves data and schema untouched.

use crate::contract::{pet_entry, DATABASE_VERSION};
use crate::db::{DbError, DbResult};
use log::{info, warn};
use rusqlite::Connection;

/// Returns the schema version this binary writes.
pub fn latest_version() -> u32 {
    DATABASE_VERSION
}

/// Brings `conn` to the current schema version.
///
/// # Errors
/// - `DbError::UnsupportedSchemaVersion` when the file was written by a newer
///   schema.
/// - `DbError::Sqlite` when creation or version stamping fails.
pub fn ensure_schema(conn: &mut Connection) -> DbResult<()> {
    ensure_schema_version(conn, latest_version())
}

fn ensure_schema_version(conn: &mut Connection, latest: u32) -> DbResult<()> {
    let current_version = current_user_version(conn)?;

    if current_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }

    if current_version == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    if current_version == 0 {
        tx.execute_batch(pet_entry::SQL_CREATE_PETS_TABLE)?;
        info!("event=schema_create module=db status=ok version={latest}");
    } else {
        on_upgrade(&tx, current_version, latest);
    }
    tx.execute_batch(&format!("PRAGMA user_version = {latest};"))?;
    tx.commit()?;

    Ok(())
}

// No migration exists yet; older files keep their table as-is.
fn on_upgrade(_conn: &Connection, old_version: u32, new_version: u32) {
    warn!(
        "event=schema_upgrade module=db status=skipped from={old_version} to={new_version}"
    );
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::{current_user_version, ensure_schema, ensure_schema_version, latest_version};
    use rusqlite::Connection;

    #[test]
    fn fresh_connection_gets_table_and_version() {
        let mut conn = Connection::open_in_memory().expect("open in-memory db");
        ensure_schema(&mut conn).expect("schema should apply");

        assert_eq!(
            current_user_version(&conn).expect("read version"),
            latest_version()
        );
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM pets;", [], |row| row.get(0))
            .expect("pets table should exist");
        assert_eq!(count, 0);
    }

    #[test]
    fn upgrade_hook_keeps_rows_and_stamps_new_version() {
        let mut conn = Connection::open_in_memory().expect("open in-memory db");
        ensure_schema(&mut conn).expect("schema should apply");
        conn.execute(
            "INSERT INTO pets (name, breed, gender, weight) VALUES ('Toto', 'Terrier', 1, 7);",
            [],
        )
        .expect("seed row");

        let next = latest_version() + 1;
        ensure_schema_version(&mut conn, next).expect("upgrade should be a no-op");

        assert_eq!(current_user_version(&conn).expect("read version"), next);
        let name: String = conn
            .query_row("SELECT name FROM pets;", [], |row| row.get(0))
            .expect("row should survive upgrade");
        assert_eq!(name, "Toto");
    }
}
