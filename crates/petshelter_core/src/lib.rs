//! Core data layer for the pet shelter store.
//! Storage, address routing and validation live here; UI hosts only call in.

pub mod config;
pub mod contract;
pub mod db;
pub mod logging;
pub mod model;
pub mod notify;
pub mod provider;
pub mod service;

pub use config::{ConfigError, DatabaseLocation, GenderPolicy, ShelterConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::pet::{Gender, Pet, PetDraft, RowDecodeError};
pub use notify::{ChangeNotifier, ContentObserver, ObserverId};
pub use provider::{
    ContentUri, ContentValues, Cursor, CursorRow, PetProvider, PetUriMatch, ProviderError,
    ProviderResult, Selection,
};
pub use service::pet_service::{PetService, SaveOutcome, ServiceError, ServiceResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
