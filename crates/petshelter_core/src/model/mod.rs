//! Typed projection of pets rows.
//!
//! # Responsibility
//! - Give callers a `Pet` struct instead of raw cursor values.
//! - Convert drafts into the `ContentValues` the provider validates.
//!
//! # Invariants
//! - The provider stays the only validator; model types never write.

pub mod pet;
