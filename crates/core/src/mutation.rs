//! Upsert commands for the generic `masters/createAndUpdateMaster` endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{flag_value, Record, RecordId, IS_ACTIVE_FIELD};

/// A create-or-update instruction.
///
/// Absence of `id` means create; presence means update-by-id. The
/// `input_data` map carries only the fields the user intends to change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationCommand {
    pub model_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub input_data: Record,
}

impl MutationCommand {
    pub fn create(model_name: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            id: None,
            input_data: Record::new(),
        }
    }

    pub fn update(model_name: impl Into<String>, id: RecordId) -> Self {
        Self {
            model_name: model_name.into(),
            id: Some(id),
            input_data: Record::new(),
        }
    }

    /// Create when `id` is `None`, update otherwise.
    pub fn upsert(model_name: impl Into<String>, id: Option<RecordId>) -> Self {
        Self {
            model_name: model_name.into(),
            id,
            input_data: Record::new(),
        }
    }

    /// Single-field status change, as sent by the list-screen toggles.
    pub fn toggle(model_name: impl Into<String>, id: RecordId, active: bool) -> Self {
        Self::update(model_name, id).set_flag(IS_ACTIVE_FIELD, active)
    }

    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.input_data.insert(field.into(), value.into());
        self
    }

    /// Set a `0`/`1` flag field.
    pub fn set_flag(self, field: impl Into<String>, on: bool) -> Self {
        self.set(field, flag_value(on))
    }

    /// Set a field only when `value` is present.
    pub fn set_opt(self, field: impl Into<String>, value: Option<impl Into<Value>>) -> Self {
        match value {
            Some(v) => self.set(field, v),
            None => self,
        }
    }

    pub fn is_create(&self) -> bool {
        self.id.is_none()
    }
}
