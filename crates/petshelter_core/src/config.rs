//! Composition-root settings for the pet store.
//!
//! # Responsibility
//! - Describe where the database lives, which authority the router answers
//!   for, and which gender rule writes must satisfy.
//! - Load the same settings from JSON for hosts that keep them on disk.

use crate::contract::{pet_entry, CONTENT_AUTHORITY, DATABASE_NAME};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Where the pets database is opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatabaseLocation {
    File(PathBuf),
    InMemory,
}

/// Range rule applied to `gender` on insert and update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenderPolicy {
    /// Rejects codes above `GENDER_FEMALE` only. Negative codes pass; kept
    /// for compatibility with rows written by earlier releases.
    #[default]
    UpperBoundOnly,
    /// Accepts exactly the known codes.
    Strict,
}

impl GenderPolicy {
    pub fn accepts(self, code: i64) -> bool {
        match self {
            Self::UpperBoundOnly => code <= pet_entry::GENDER_FEMALE,
            Self::Strict => (pet_entry::GENDER_UNKNOWN..=pet_entry::GENDER_FEMALE).contains(&code),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShelterConfig {
    pub database: DatabaseLocation,
    pub authority: String,
    pub gender_policy: GenderPolicy,
}

impl Default for ShelterConfig {
    fn default() -> Self {
        Self {
            database: DatabaseLocation::File(PathBuf::from(DATABASE_NAME)),
            authority: CONTENT_AUTHORITY.to_string(),
            gender_policy: GenderPolicy::default(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Json(serde_json::Error),
    InvalidAuthority(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid config document: {err}"),
            Self::InvalidAuthority(value) => write!(f, "invalid content authority: `{value}`"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::InvalidAuthority(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl ShelterConfig {
    /// Default settings with the database file placed under `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            database: DatabaseLocation::File(dir.as_ref().join(DATABASE_NAME)),
            ..Self::default()
        }
    }

    pub fn in_memory() -> Self {
        Self {
            database: DatabaseLocation::InMemory,
            ..Self::default()
        }
    }

    /// Parses a JSON document; missing fields take their defaults.
    pub fn from_json_str(document: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(document)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let authority = self.authority.as_str();
        if authority.trim().is_empty()
            || authority.chars().any(|c| c == '/' || c.is_whitespace())
        {
            return Err(ConfigError::InvalidAuthority(self.authority.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, DatabaseLocation, GenderPolicy, ShelterConfig};
    use std::path::PathBuf;

    #[test]
    fn gender_policies_differ_only_below_zero() {
        for code in 0..=2 {
            assert!(GenderPolicy::UpperBoundOnly.accepts(code));
            assert!(GenderPolicy::Strict.accepts(code));
        }
        assert!(!GenderPolicy::UpperBoundOnly.accepts(3));
        assert!(!GenderPolicy::Strict.accepts(3));
        assert!(GenderPolicy::UpperBoundOnly.accepts(-1));
        assert!(!GenderPolicy::Strict.accepts(-1));
    }

    #[test]
    fn json_document_fills_missing_fields_with_defaults() {
        let config = ShelterConfig::from_json_str(
            r#"{ "database": { "file": "/var/lib/shelter/pets.db" }, "gender_policy": "strict" }"#,
        )
        .expect("config should parse");

        assert_eq!(
            config.database,
            DatabaseLocation::File(PathBuf::from("/var/lib/shelter/pets.db"))
        );
        assert_eq!(config.gender_policy, GenderPolicy::Strict);
        assert_eq!(config.authority, "com.example.android.pets");
    }

    #[test]
    fn in_memory_location_round_trips_through_json() {
        let json = serde_json::to_string(&ShelterConfig::in_memory()).expect("serialize config");
        let parsed = ShelterConfig::from_json_str(&json).expect("parse config");
        assert_eq!(parsed.database, DatabaseLocation::InMemory);
    }

    #[test]
    fn rejects_authority_with_path_separator() {
        let err = ShelterConfig::from_json_str(r#"{ "authority": "a/b" }"#)
            .expect_err("authority with slash must be rejected");
        assert!(matches!(err, ConfigError::InvalidAuthority(_)));
    }

    #[test]
    fn in_dir_joins_default_file_name() {
        let config = ShelterConfig::in_dir("/data/app");
        assert_eq!(
            config.database,
            DatabaseLocation::File(PathBuf::from("/data/app/shelter.db"))
        );
    }
}
