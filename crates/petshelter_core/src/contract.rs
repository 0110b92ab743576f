//! Pet store contract: URI pieces, table layout and value encodings.
//!
//! # Responsibility
//! - Single source of truth for names shared by storage, router and callers.
//!
//! # Invariants
//! - `COLUMNS` lists every column of `pets` in table order.
//! - Gender codes are stable; they are persisted as-is.

/// Name of the whole provider, used as the URI authority.
pub const CONTENT_AUTHORITY: &str = "com.example.android.pets";

/// URI scheme for every provider address.
pub const CONTENT_SCHEME: &str = "content";

/// Path segment addressing the pets collection.
pub const PATH_PETS: &str = "pets";

/// Database file name used when no explicit path is configured.
pub const DATABASE_NAME: &str = "shelter.db";

/// Schema version stamped into `PRAGMA user_version`.
pub const DATABASE_VERSION: u32 = 1;

/// Table and column names.
pub mod pet_entry {
    pub const TABLE_NAME: &str = "pets";

    pub const ID: &str = "_id";
    pub const NAME: &str = "name";
    pub const BREED: &str = "breed";
    pub const GENDER: &str = "gender";
    pub const WEIGHT: &str = "weight";

    /// Every column in table order.
    pub const COLUMNS: [&str; 5] = [ID, NAME, BREED, GENDER, WEIGHT];

    /// Columns a caller may supply values for.
    pub const WRITABLE_COLUMNS: [&str; 4] = [NAME, BREED, GENDER, WEIGHT];

    pub const GENDER_UNKNOWN: i64 = 0;
    pub const GENDER_MALE: i64 = 1;
    pub const GENDER_FEMALE: i64 = 2;

    pub const WEIGHT_DEFAULT: i64 = 0;

    pub const CURSOR_DIR_BASE_TYPE: &str = "vnd.android.cursor.dir";
    pub const CURSOR_ITEM_BASE_TYPE: &str = "vnd.android.cursor.item";

    /// Type label for a collection of pets under the default authority.
    pub const CONTENT_LIST_TYPE: &str = "vnd.android.cursor.dir/com.example.android.pets/pets";

    /// Type label for a single pet under the default authority.
    pub const CONTENT_ITEM_TYPE: &str = "vnd.android.cursor.item/com.example.android.pets/pets";

    /// Collection type label for a provider serving `authority`.
    pub fn list_type(authority: &str) -> String {
        format!("{CURSOR_DIR_BASE_TYPE}/{authority}/{}", super::PATH_PETS)
    }

    /// Item type label for a provider serving `authority`.
    pub fn item_type(authority: &str) -> String {
        format!("{CURSOR_ITEM_BASE_TYPE}/{authority}/{}", super::PATH_PETS)
    }

    pub const SQL_CREATE_PETS_TABLE: &str = "CREATE TABLE IF NOT EXISTS pets (
        _id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        breed TEXT,
        gender INTEGER NOT NULL,
        weight INTEGER NOT NULL DEFAULT 0
    );";

    /// Returns whether `column` names a column of the pets table.
    pub fn is_known_column(column: &str) -> bool {
        COLUMNS.contains(&column)
    }
}
