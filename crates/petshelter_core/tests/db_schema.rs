use petshelter_core::db::schema::latest_version;
use petshelter_core::db::{open_db, open_db_in_memory, DbError, PetDbHelper};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_creates_pets_table() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "pets");
}

#[test]
fn reopening_same_file_keeps_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shelter.db");

    let helper = PetDbHelper::open(&path).unwrap();
    assert_eq!(helper.location(), Some(path.as_path()));
    helper
        .open_for_write()
        .unwrap()
        .execute(
            "INSERT INTO pets (name, breed, gender, weight) VALUES ('Toto', 'Terrier', 1, 7);",
            [],
        )
        .unwrap();
    drop(helper);

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM pets;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn weight_defaults_to_zero() {
    let conn = open_db_in_memory().unwrap();
    conn.execute("INSERT INTO pets (name, gender) VALUES ('Rex', 0);", [])
        .unwrap();

    let weight: i64 = conn
        .query_row("SELECT weight FROM pets;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(weight, 0);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = PetDbHelper::open(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
