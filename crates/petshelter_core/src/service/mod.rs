//! Pet use-case services.
//!
//! # Responsibility
//! - Offer catalog and editor operations in terms of `Pet`/`PetDraft`.
//! - Keep callers away from raw values, selections and cursors.

pub mod pet_service;
