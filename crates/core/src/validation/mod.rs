//! Form validation.
//!
//! Provides the shared rule vocabulary, a field-error map, and the
//! per-field check chain the entity forms are written in. Everything is
//! synchronous and local; nothing here talks to the network.

pub mod errors;
pub mod phone;
pub mod rich_text;
pub mod rules;

pub use errors::{FieldCheck, FieldErrors};
