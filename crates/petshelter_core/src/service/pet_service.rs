//! Catalog and editor use cases over the pet provider.
//!
//! # Invariants
//! - Every call goes through `PetProvider`; validation is never duplicated
//!   or bypassed here.
//! - Save outcomes are reported as the provider returned them.

use crate::contract::pet_entry;
use crate::model::pet::{Gender, Pet, PetDraft, RowDecodeError};
use crate::provider::{
    ContentUri, ContentValues, Cursor, PetProvider, PetUriMatch, ProviderError, Selection,
};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug)]
pub enum ServiceError {
    Provider(ProviderError),
    InvalidData(RowDecodeError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Provider(err) => write!(f, "{err}"),
            Self::InvalidData(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Provider(err) => Some(err),
            Self::InvalidData(err) => Some(err),
        }
    }
}

impl From<ProviderError> for ServiceError {
    fn from(value: ProviderError) -> Self {
        Self::Provider(value)
    }
}

impl From<RowDecodeError> for ServiceError {
    fn from(value: RowDecodeError) -> Self {
        Self::InvalidData(value)
    }
}

/// Result of [`PetService::save_pet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// A new row was created at this address.
    Inserted(ContentUri),
    /// Storage refused the new row.
    InsertFailed,
    /// An existing address was updated; carries rows affected.
    Updated(usize),
}

/// Use-case wrapper around a borrowed provider.
pub struct PetService<'p> {
    provider: &'p PetProvider,
}

impl<'p> PetService<'p> {
    pub fn new(provider: &'p PetProvider) -> Self {
        Self { provider }
    }

    /// Inserts the sample pet `Andy`, a 7 kg male terrier.
    pub fn insert_dummy_pet(&self) -> ServiceResult<Option<ContentUri>> {
        let draft = PetDraft::new("Andy")
            .breed("Terrier")
            .gender(Gender::Male)
            .weight(7);
        Ok(self
            .provider
            .insert(self.provider.content_uri(), &draft.to_values())?)
    }

    /// Inserts `draft` when `target` is `None`, otherwise updates the single
    /// pet at `target`. Collection addresses are rejected as targets.
    pub fn save_pet(
        &self,
        target: Option<&ContentUri>,
        draft: &PetDraft,
    ) -> ServiceResult<SaveOutcome> {
        let values = draft.to_values();
        match target {
            None => Ok(
                match self.provider.insert(self.provider.content_uri(), &values)? {
                    Some(uri) => SaveOutcome::Inserted(uri),
                    None => SaveOutcome::InsertFailed,
                },
            ),
            Some(uri) => match self.provider.match_uri(uri) {
                Some(PetUriMatch::PetId(_)) => Ok(SaveOutcome::Updated(
                    self.provider.update(uri, &values, None)?,
                )),
                _ => Err(ProviderError::InvalidArgument(format!(
                    "save target must be a single pet, got {uri}"
                ))
                .into()),
            },
        }
    }

    /// Sets `breed` on every pet called `name`; returns rows affected.
    pub fn rename_breed_by_name(&self, name: &str, breed: &str) -> ServiceResult<usize> {
        let mut values = ContentValues::new();
        values.put_str(pet_entry::BREED, breed);
        let selection = Selection::new(format!("{} = ?", pet_entry::NAME)).with_text_arg(name);
        Ok(self
            .provider
            .update(self.provider.content_uri(), &values, Some(&selection))?)
    }

    pub fn delete_pet(&self, uri: &ContentUri) -> ServiceResult<usize> {
        Ok(self.provider.delete(uri, None)?)
    }

    pub fn delete_all_pets(&self) -> ServiceResult<usize> {
        Ok(self.provider.delete(self.provider.content_uri(), None)?)
    }

    /// All pets ordered by id.
    pub fn list_pets(&self) -> ServiceResult<Vec<Pet>> {
        let cursor = self.provider.query(
            self.provider.content_uri(),
            None,
            None,
            Some(pet_entry::ID),
        )?;
        decode_all(&cursor)
    }

    /// The pet at an item address, `None` when the row does not exist.
    pub fn get_pet(&self, uri: &ContentUri) -> ServiceResult<Option<Pet>> {
        let cursor = self.provider.query(uri, None, None, None)?;
        match cursor.row(0) {
            Some(row) => Ok(Some(Pet::from_row(&row)?)),
            None => Ok(None),
        }
    }
}

fn decode_all(cursor: &Cursor) -> ServiceResult<Vec<Pet>> {
    cursor
        .rows()
        .map(|row| Pet::from_row(&row).map_err(ServiceError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{PetService, SaveOutcome, ServiceError};
    use crate::config::ShelterConfig;
    use crate::model::pet::{Gender, PetDraft};
    use crate::provider::{PetProvider, ProviderError};

    #[test]
    fn save_pet_inserts_then_updates() {
        let provider = PetProvider::open(&ShelterConfig::in_memory()).expect("open provider");
        let service = PetService::new(&provider);

        let draft = PetDraft::new("Milo").breed("Beagle").gender(Gender::Male);
        let uri = match service.save_pet(None, &draft).expect("insert") {
            SaveOutcome::Inserted(uri) => uri,
            other => panic!("unexpected outcome: {other:?}"),
        };

        let edited = draft.clone().weight(12);
        assert_eq!(
            service.save_pet(Some(&uri), &edited).expect("update"),
            SaveOutcome::Updated(1)
        );
        let stored = service.get_pet(&uri).expect("get").expect("row exists");
        assert_eq!(stored.weight, 12);
        assert_eq!(stored.gender_kind(), Some(Gender::Male));
    }

    #[test]
    fn save_pet_refuses_collection_target() {
        let provider = PetProvider::open(&ShelterConfig::in_memory()).expect("open provider");
        let service = PetService::new(&provider);
        let draft = PetDraft::new("Milo").breed("Beagle");
        service.save_pet(None, &draft).expect("insert first");
        service
            .save_pet(None, &PetDraft::new("Luna"))
            .expect("insert second");

        let err = service
            .save_pet(Some(provider.content_uri()), &draft.clone().weight(3))
            .expect_err("collection target");
        assert!(matches!(
            err,
            ServiceError::Provider(ProviderError::InvalidArgument(_))
        ));
        let names: Vec<String> = service
            .list_pets()
            .expect("list")
            .into_iter()
            .map(|pet| pet.name)
            .collect();
        assert_eq!(names, ["Milo", "Luna"]);
    }
}
