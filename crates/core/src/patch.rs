//! Row patching for cached list pages.
//!
//! After a single-row mutation the visible page is patched in memory
//! instead of re-fetched. Every function here is pure: it returns a new
//! sequence and leaves the input untouched.

use crate::types::{record_id, Record, RecordId};

/// Return `cache` with the record whose id is `id` replaced by
/// `{...record, ...fields}`. All other records are carried over unchanged
/// and the length never changes. An id that is not cached is a no-op.
pub fn patch_row(cache: &[Record], id: &RecordId, fields: &Record) -> Vec<Record> {
    cache
        .iter()
        .map(|record| {
            if record_id(record).as_ref() == Some(id) {
                let mut patched = record.clone();
                for (key, value) in fields {
                    patched.insert(key.clone(), value.clone());
                }
                patched
            } else {
                record.clone()
            }
        })
        .collect()
}

/// Whether patching `fields` in place is safe for a page that was searched
/// over `search_fields` and filtered on `filter_fields`.
///
/// A change to any of those fields can move the row out of the current
/// page or result set, so the caller must re-query instead.
pub fn is_patch_safe<'a>(
    fields: &Record,
    search_fields: impl IntoIterator<Item = &'a str>,
    filter_fields: impl IntoIterator<Item = &'a str>,
) -> bool {
    let touches = |name: &str| {
        let root = name.split('.').next().unwrap_or(name);
        fields.contains_key(root)
    };
    !search_fields.into_iter().any(touches) && !filter_fields.into_iter().any(touches)
}

/// Append `incoming` to `existing`, skipping records whose id is already
/// present. Used only by the infinite-scroll list variant.
pub fn append_unique(existing: &[Record], incoming: Vec<Record>) -> Vec<Record> {
    let mut merged = existing.to_vec();
    for record in incoming {
        let duplicate = match record_id(&record) {
            Some(id) => merged
                .iter()
                .any(|cached| record_id(cached).as_ref() == Some(&id)),
            None => false,
        };
        if !duplicate {
            merged.push(record);
        }
    }
    merged
}
