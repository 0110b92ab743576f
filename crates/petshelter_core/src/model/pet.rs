//! Pet record and gender enumeration.

use crate::contract::pet_entry;
use crate::provider::{ContentValues, CursorRow};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Known gender codes as stored in `pets.gender`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    #[default]
    Unknown,
    Male,
    Female,
}

impl Gender {
    pub fn code(self) -> i64 {
        match self {
            Self::Unknown => pet_entry::GENDER_UNKNOWN,
            Self::Male => pet_entry::GENDER_MALE,
            Self::Female => pet_entry::GENDER_FEMALE,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            pet_entry::GENDER_UNKNOWN => Some(Self::Unknown),
            pet_entry::GENDER_MALE => Some(Self::Male),
            pet_entry::GENDER_FEMALE => Some(Self::Female),
            _ => None,
        }
    }
}

/// Stored pet row.
///
/// `gender` keeps the raw code because rows written under the lenient
/// gender policy may hold codes outside [`Gender`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub id: i64,
    pub name: String,
    pub breed: Option<String>,
    pub gender: i64,
    pub weight: i64,
}

/// A row column that was missing or had the wrong type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowDecodeError {
    pub column: &'static str,
}

impl Display for RowDecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid persisted pet data in pets.{}", self.column)
    }
}

impl Error for RowDecodeError {}

impl Pet {
    /// Decodes a row queried with every pets column.
    pub fn from_row(row: &CursorRow<'_>) -> Result<Self, RowDecodeError> {
        let integer = |column: &'static str| row.get_i64(column).ok_or(RowDecodeError { column });

        Ok(Self {
            id: integer(pet_entry::ID)?,
            name: row
                .get_str(pet_entry::NAME)
                .ok_or(RowDecodeError {
                    column: pet_entry::NAME,
                })?
                .to_string(),
            breed: row.get_str(pet_entry::BREED).map(str::to_string),
            gender: integer(pet_entry::GENDER)?,
            weight: integer(pet_entry::WEIGHT)?,
        })
    }

    /// Gender as a known enumeration value, `None` for out-of-range codes.
    pub fn gender_kind(&self) -> Option<Gender> {
        Gender::from_code(self.gender)
    }
}

/// Field values for creating or editing a pet.
///
/// A `None` breed is left out of the written values, so an edit keeps the
/// stored breed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetDraft {
    pub name: String,
    pub breed: Option<String>,
    pub gender: Gender,
    pub weight: i64,
}

impl PetDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            breed: None,
            gender: Gender::Unknown,
            weight: pet_entry::WEIGHT_DEFAULT,
        }
    }

    pub fn breed(mut self, breed: impl Into<String>) -> Self {
        self.breed = Some(breed.into());
        self
    }

    pub fn gender(mut self, gender: Gender) -> Self {
        self.gender = gender;
        self
    }

    pub fn weight(mut self, weight: i64) -> Self {
        self.weight = weight;
        self
    }

    /// Values for every writable column; `breed` is omitted when unset.
    pub fn to_values(&self) -> ContentValues {
        let mut values = ContentValues::new();
        values
            .put_str(pet_entry::NAME, self.name.as_str())
            .put_i64(pet_entry::GENDER, self.gender.code())
            .put_i64(pet_entry::WEIGHT, self.weight);
        if let Some(breed) = &self.breed {
            values.put_str(pet_entry::BREED, breed.as_str());
        }
        values
    }
}

#[cfg(test)]
mod tests {
    use super::{Gender, PetDraft};

    #[test]
    fn gender_codes_match_contract() {
        for gender in [Gender::Unknown, Gender::Male, Gender::Female] {
            assert_eq!(Gender::from_code(gender.code()), Some(gender));
        }
        assert_eq!(Gender::from_code(3), None);
        assert_eq!(Gender::from_code(-1), None);
    }

    #[test]
    fn draft_values_skip_missing_breed() {
        let values = PetDraft::new("Rex").weight(10).to_values();
        assert!(!values.contains_key("breed"));
        assert_eq!(values.get_as_integer("gender"), Some(0));
        assert_eq!(values.get_as_integer("weight"), Some(10));
    }
}
