//! Field-error map and the per-field check chain.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::rules;

/// Map of field name to message, rebuilt wholesale on every validation
/// pass and cleared per field as the user edits that field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error for `field`. The first message recorded for a field
    /// wins; later ones are ignored.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    /// Drop the error for a single field, e.g. when the user edits it.
    pub fn clear(&mut self, field: &str) {
        self.0.remove(field);
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Merge another pass into this one, keeping existing messages.
    pub fn extend(&mut self, other: FieldErrors) {
        for (field, message) in other.0 {
            self.insert(field, message);
        }
    }

    /// `Ok(())` when clean, otherwise the errors themselves.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Start a check chain for one field.
    pub fn field<'a>(&'a mut self, name: &str, value: &'a str) -> FieldCheck<'a> {
        FieldCheck {
            errors: self,
            name: name.to_string(),
            value,
            failed: false,
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// Ordered rule chain for a single field.
///
/// Rules run in the order they are chained; the first failing rule records
/// its message and every later rule on the same field is skipped. Separate
/// fields are independent, so one pass reports every invalid field.
pub struct FieldCheck<'a> {
    errors: &'a mut FieldErrors,
    name: String,
    value: &'a str,
    failed: bool,
}

impl FieldCheck<'_> {
    /// Apply an arbitrary predicate.
    pub fn satisfies(mut self, ok: impl FnOnce(&str) -> bool, message: &str) -> Self {
        if !self.failed && !ok(self.value) {
            self.errors.insert(self.name.clone(), message);
            self.failed = true;
        }
        self
    }

    /// Trimmed value must be non-empty.
    pub fn required(self, message: &str) -> Self {
        self.satisfies(rules::is_present, message)
    }

    pub fn no_leading_space(self, message: &str) -> Self {
        self.satisfies(rules::has_no_leading_space, message)
    }

    /// Trimmed value must have at least `min` characters.
    pub fn min_len(self, min: usize, message: &str) -> Self {
        self.satisfies(|v| rules::has_min_chars(v, min), message)
    }

    pub fn alphabetic(self, message: &str) -> Self {
        self.satisfies(rules::is_alphabetic, message)
    }

    pub fn alphanumeric(self, message: &str) -> Self {
        self.satisfies(rules::is_alphanumeric, message)
    }

    pub fn numeric(self, message: &str) -> Self {
        self.satisfies(rules::is_numeric, message)
    }

    pub fn decimal(self, message: &str) -> Self {
        self.satisfies(rules::is_decimal, message)
    }

    pub fn email(self, message: &str) -> Self {
        self.satisfies(rules::is_email, message)
    }

    pub fn phone(self, message: &str) -> Self {
        self.satisfies(rules::is_phone, message)
    }

    /// HTML content must have visible text once tags are stripped.
    pub fn rich_text(self, message: &str) -> Self {
        self.satisfies(rules::has_rich_text_content, message)
    }

    /// Whether any rule in this chain has failed so far.
    pub fn failed(&self) -> bool {
        self.failed
    }
}
