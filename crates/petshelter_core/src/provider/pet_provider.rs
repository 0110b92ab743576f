//! Router and validation policy for the pets table.

use super::cursor::Cursor;
use super::matcher::UriMatcher;
use super::uri::ContentUri;
use super::values::ContentValues;
use super::{ProviderError, ProviderResult};
use crate::config::{DatabaseLocation, GenderPolicy, ShelterConfig};
use crate::contract::{pet_entry, PATH_PETS};
use crate::db::PetDbHelper;
use crate::notify::ChangeNotifier;
use log::{debug, error, warn};
use rusqlite::params_from_iter;
use rusqlite::types::Value;
use std::sync::Arc;

/// Route codes registered in the pets matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PetRoute {
    Pets,
    PetId,
}

/// A content address resolved against the pets routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PetUriMatch {
    /// The whole table.
    Pets,
    /// One row by `_id`.
    PetId(i64),
}

/// Builds the route table for `<authority>/pets` and `<authority>/pets/#`.
pub fn pets_uri_matcher(authority: &str) -> UriMatcher<PetRoute> {
    UriMatcher::builder()
        .add_uri(authority, PATH_PETS, PetRoute::Pets)
        .add_uri(authority, &format!("{PATH_PETS}/#"), PetRoute::PetId)
        .build()
}

/// Row filter: an SQL boolean expression with anonymous `?` placeholders
/// bound, in order, to `args`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    clause: String,
    args: Vec<Value>,
}

impl Selection {
    pub fn new(clause: impl Into<String>) -> Self {
        Self {
            clause: clause.into(),
            args: Vec::new(),
        }
    }

    /// Filter matching exactly the row with `_id = id`.
    pub fn by_id(id: i64) -> Self {
        Self::new(format!("{} = ?", pet_entry::ID)).with_arg(id)
    }

    pub fn with_arg(mut self, arg: impl Into<Value>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn with_text_arg(self, arg: impl Into<String>) -> Self {
        self.with_arg(Value::Text(arg.into()))
    }

    pub fn clause(&self) -> &str {
        &self.clause
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }
}

/// The single entry point for pet reads and writes.
///
/// Owns the storage handle, the frozen route table and the observer
/// registry. All calls block until SQLite returns.
pub struct PetProvider {
    helper: PetDbHelper,
    matcher: UriMatcher<PetRoute>,
    notifier: Arc<ChangeNotifier>,
    gender_policy: GenderPolicy,
    content_uri: ContentUri,
    list_type: String,
    item_type: String,
}

impl PetProvider {
    /// Assembles a provider from already-built parts. `authority` must be
    /// the one `matcher` was built for.
    pub fn new(
        helper: PetDbHelper,
        authority: &str,
        matcher: UriMatcher<PetRoute>,
        notifier: Arc<ChangeNotifier>,
    ) -> Self {
        Self {
            helper,
            matcher,
            notifier,
            gender_policy: GenderPolicy::default(),
            content_uri: ContentUri::new(authority, [PATH_PETS]),
            list_type: pet_entry::list_type(authority),
            item_type: pet_entry::item_type(authority),
        }
    }

    /// Opens storage and wires matcher and notifier according to `config`.
    pub fn open(config: &ShelterConfig) -> ProviderResult<Self> {
        config
            .validate()
            .map_err(|err| ProviderError::InvalidArgument(err.to_string()))?;
        let helper = match &config.database {
            DatabaseLocation::File(path) => PetDbHelper::open(path)?,
            DatabaseLocation::InMemory => PetDbHelper::open_in_memory()?,
        };

        let provider = Self::new(
            helper,
            &config.authority,
            pets_uri_matcher(&config.authority),
            Arc::new(ChangeNotifier::new()),
        );
        Ok(provider.with_gender_policy(config.gender_policy))
    }

    pub fn with_gender_policy(mut self, policy: GenderPolicy) -> Self {
        self.gender_policy = policy;
        self
    }

    /// Collection address served by this provider.
    pub fn content_uri(&self) -> &ContentUri {
        &self.content_uri
    }

    pub fn notifier(&self) -> &Arc<ChangeNotifier> {
        &self.notifier
    }

    pub fn gender_policy(&self) -> GenderPolicy {
        self.gender_policy
    }

    /// Resolves `uri` against the route table.
    pub fn match_uri(&self, uri: &ContentUri) -> Option<PetUriMatch> {
        match self.matcher.match_uri(uri)? {
            PetRoute::Pets => Some(PetUriMatch::Pets),
            PetRoute::PetId => uri.parse_id().map(PetUriMatch::PetId),
        }
    }

    /// Reads rows. The item form ignores `selection` and filters by its id.
    ///
    /// `projection` of `None` (or empty) selects every column. Projection
    /// and sort terms must name pets columns.
    pub fn query(
        &self,
        uri: &ContentUri,
        projection: Option<&[&str]>,
        selection: Option<&Selection>,
        sort_order: Option<&str>,
    ) -> ProviderResult<Cursor> {
        let by_id;
        let selection = match self.match_uri(uri) {
            Some(PetUriMatch::Pets) => selection,
            Some(PetUriMatch::PetId(id)) => {
                by_id = Selection::by_id(id);
                Some(&by_id)
            }
            None => {
                return Err(ProviderError::InvalidArgument(format!(
                    "cannot query unknown URI {uri}"
                )))
            }
        };

        let columns = resolve_projection(projection)?;
        let mut sql = format!("SELECT {} FROM {}", columns.join(", "), pet_entry::TABLE_NAME);
        let args = push_where(&mut sql, selection);
        if let Some(sort_order) = sort_order.filter(|order| !order.trim().is_empty()) {
            check_sort_order(sort_order)?;
            sql.push_str(" ORDER BY ");
            sql.push_str(sort_order);
        }

        let conn = self.helper.open_for_read()?;
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(args))?;
        let mut materialized = Vec::new();
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(columns.len());
            for index in 0..columns.len() {
                values.push(row.get::<_, Value>(index)?);
            }
            materialized.push(values);
        }

        debug!(
            "event=pet_query module=provider status=ok rows={}",
            materialized.len()
        );
        Ok(Cursor::new(columns, materialized, uri.clone()))
    }

    /// Inserts one pet through the collection address.
    ///
    /// Returns the new row's item address, or `None` when SQLite refused the
    /// row (the failure is logged and no observer is notified).
    pub fn insert(
        &self,
        uri: &ContentUri,
        values: &ContentValues,
    ) -> ProviderResult<Option<ContentUri>> {
        match self.match_uri(uri) {
            Some(PetUriMatch::Pets) => self.insert_pet(uri, values),
            _ => Err(ProviderError::InvalidArgument(format!(
                "insertion is not supported for {uri}"
            ))),
        }
    }

    /// Updates rows and returns how many matched. Only keys present in
    /// `values` are validated and written; an empty `values` is rejected.
    pub fn update(
        &self,
        uri: &ContentUri,
        values: &ContentValues,
        selection: Option<&Selection>,
    ) -> ProviderResult<usize> {
        match self.match_uri(uri) {
            Some(PetUriMatch::Pets) => self.update_pet(uri, values, selection),
            Some(PetUriMatch::PetId(id)) => {
                self.update_pet(uri, values, Some(&Selection::by_id(id)))
            }
            None => Err(ProviderError::InvalidArgument(format!(
                "update is not supported for {uri}"
            ))),
        }
    }

    /// Deletes rows and returns how many were removed.
    pub fn delete(&self, uri: &ContentUri, selection: Option<&Selection>) -> ProviderResult<usize> {
        match self.match_uri(uri) {
            Some(PetUriMatch::Pets) => self.delete_pet(uri, selection),
            Some(PetUriMatch::PetId(id)) => self.delete_pet(uri, Some(&Selection::by_id(id))),
            None => Err(ProviderError::InvalidArgument(format!(
                "deletion is not supported for {uri}"
            ))),
        }
    }

    /// Returns the collection or item type label for `uri`.
    pub fn get_type(&self, uri: &ContentUri) -> ProviderResult<&str> {
        match self.match_uri(uri) {
            Some(PetUriMatch::Pets) => Ok(self.list_type.as_str()),
            Some(PetUriMatch::PetId(_)) => Ok(self.item_type.as_str()),
            None => Err(ProviderError::InvalidState(format!("unknown URI {uri}"))),
        }
    }

    fn insert_pet(
        &self,
        uri: &ContentUri,
        values: &ContentValues,
    ) -> ProviderResult<Option<ContentUri>> {
        require_text(values, pet_entry::NAME, "Pet requires a name")?;
        if values.contains_key(pet_entry::BREED) {
            require_text(values, pet_entry::BREED, "Pet requires a breed")?;
        }
        self.check_gender(values)?;
        check_columns(values)?;

        let columns: Vec<&str> = values.keys().collect();
        let placeholders = vec!["?"; columns.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({placeholders});",
            pet_entry::TABLE_NAME,
            columns.join(", ")
        );

        let id = {
            let conn = self.helper.open_for_write()?;
            match conn.execute(&sql, params_from_iter(values.iter().map(|(_, v)| v))) {
                Ok(_) => conn.last_insert_rowid(),
                Err(err) => {
                    error!(
                        "event=pet_insert module=provider status=error error_code=insert_failed uri={} error={}",
                        uri, err
                    );
                    return Ok(None);
                }
            }
        };

        debug!("event=pet_insert module=provider status=ok id={id}");
        self.notifier.notify_change(uri);
        Ok(Some(uri.with_appended_id(id)))
    }

    fn update_pet(
        &self,
        uri: &ContentUri,
        values: &ContentValues,
        selection: Option<&Selection>,
    ) -> ProviderResult<usize> {
        if values.is_empty() {
            warn!("event=pet_validate module=provider status=rejected reason=empty_values");
            return Err(ProviderError::InvalidArgument(
                "update requires at least one value".to_string(),
            ));
        }
        if values.contains_key(pet_entry::NAME) {
            require_text(values, pet_entry::NAME, "Pet requires a name")?;
        }
        if values.contains_key(pet_entry::BREED) {
            require_text(values, pet_entry::BREED, "Pet requires a breed")?;
        }
        self.check_gender(values)?;
        check_columns(values)?;

        let assignments = values
            .keys()
            .map(|column| format!("{column} = ?"))
            .collect::<Vec<_>>()
            .join(", ");
        let mut sql = format!("UPDATE {} SET {assignments}", pet_entry::TABLE_NAME);
        let selection_args = push_where(&mut sql, selection);
        let args: Vec<&Value> = values
            .iter()
            .map(|(_, value)| value)
            .chain(selection_args)
            .collect();

        let changed = {
            let conn = self.helper.open_for_write()?;
            conn.execute(&sql, params_from_iter(args))?
        };

        debug!("event=pet_update module=provider status=ok rows={changed}");
        self.notifier.notify_change(uri);
        Ok(changed)
    }

    fn delete_pet(&self, uri: &ContentUri, selection: Option<&Selection>) -> ProviderResult<usize> {
        let mut sql = format!("DELETE FROM {}", pet_entry::TABLE_NAME);
        let args = push_where(&mut sql, selection);

        let removed = {
            let conn = self.helper.open_for_write()?;
            conn.execute(&sql, params_from_iter(args))?
        };

        debug!("event=pet_delete module=provider status=ok rows={removed}");
        self.notifier.notify_change(uri);
        Ok(removed)
    }

    fn check_gender(&self, values: &ContentValues) -> ProviderResult<()> {
        if !values.contains_key(pet_entry::GENDER) {
            return Ok(());
        }
        match values.get_as_integer(pet_entry::GENDER) {
            Some(code) if self.gender_policy.accepts(code) => Ok(()),
            _ => {
                warn!("event=pet_validate module=provider status=rejected field=gender");
                Err(ProviderError::InvalidArgument(
                    "Pet requires a valid gender or 'unknown' if not known".to_string(),
                ))
            }
        }
    }
}

fn require_text(values: &ContentValues, column: &str, message: &str) -> ProviderResult<()> {
    match values.get_as_string(column) {
        Some(text) if !text.is_empty() => Ok(()),
        _ => {
            warn!("event=pet_validate module=provider status=rejected field={column}");
            Err(ProviderError::InvalidArgument(message.to_string()))
        }
    }
}

fn check_columns(values: &ContentValues) -> ProviderResult<()> {
    match values
        .keys()
        .find(|key| !pet_entry::WRITABLE_COLUMNS.contains(key))
    {
        Some(key) => Err(ProviderError::InvalidArgument(format!(
            "column `{key}` is unknown or not writable"
        ))),
        None => Ok(()),
    }
}

fn resolve_projection(projection: Option<&[&str]>) -> ProviderResult<Vec<String>> {
    let columns: &[&str] = match projection {
        Some(columns) if !columns.is_empty() => columns,
        _ => &pet_entry::COLUMNS,
    };
    columns
        .iter()
        .map(|column| {
            if pet_entry::is_known_column(column) {
                Ok((*column).to_string())
            } else {
                Err(ProviderError::InvalidArgument(format!(
                    "unknown column `{column}` in projection"
                )))
            }
        })
        .collect()
}

// Terms are `<column> [ASC|DESC]` separated by commas.
fn check_sort_order(sort_order: &str) -> ProviderResult<()> {
    for term in sort_order.split(',') {
        let mut words = term.split_whitespace();
        let valid = match (words.next(), words.next(), words.next()) {
            (Some(column), None, None) => pet_entry::is_known_column(column),
            (Some(column), Some(direction), None) => {
                pet_entry::is_known_column(column)
                    && (direction.eq_ignore_ascii_case("asc")
                        || direction.eq_ignore_ascii_case("desc"))
            }
            _ => false,
        };
        if !valid {
            return Err(ProviderError::InvalidArgument(format!(
                "invalid sort order `{sort_order}`"
            )));
        }
    }
    Ok(())
}

fn push_where<'s>(sql: &mut String, selection: Option<&'s Selection>) -> &'s [Value] {
    match selection.filter(|selection| !selection.clause().trim().is_empty()) {
        Some(selection) => {
            sql.push_str(" WHERE ");
            sql.push_str(selection.clause());
            selection.args()
        }
        None => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::{check_sort_order, resolve_projection, PetUriMatch};
    use crate::config::ShelterConfig;
    use crate::provider::{ContentUri, PetProvider};

    #[test]
    fn sort_order_accepts_known_columns_with_direction() {
        check_sort_order("name").expect("plain column");
        check_sort_order("_id DESC, name asc").expect("two terms");
        assert!(check_sort_order("name; DROP TABLE pets").is_err());
        assert!(check_sort_order("age").is_err());
        assert!(check_sort_order("name sideways").is_err());
    }

    #[test]
    fn projection_defaults_to_all_columns() {
        assert_eq!(
            resolve_projection(None).expect("default projection"),
            ["_id", "name", "breed", "gender", "weight"]
        );
        assert!(resolve_projection(Some(&["name", "owner"][..])).is_err());
    }

    #[test]
    fn match_uri_extracts_item_id() {
        let provider = PetProvider::open(&ShelterConfig::in_memory()).expect("open provider");
        let collection = ContentUri::pets();
        assert_eq!(provider.match_uri(&collection), Some(PetUriMatch::Pets));
        assert_eq!(
            provider.match_uri(&collection.with_appended_id(5)),
            Some(PetUriMatch::PetId(5))
        );
        assert_eq!(
            provider.match_uri(&ContentUri::new("com.example.android.pets", ["cats"])),
            None
        );
    }
}
