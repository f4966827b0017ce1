//! Entity forms: a draft per editable collection, its validator, and the
//! mutation it turns into once clean.
//!
//! Screens keep a draft as local state, call [`FormDraft::validate`] on
//! submit, and only build a [`MutationCommand`] when the returned
//! [`FieldErrors`] is empty. Drafts never touch cached list rows.

pub mod accounts;
pub mod content;
pub mod masters;
pub mod subscription;

use crate::mutation::MutationCommand;
use crate::types::{Record, RecordId};
use crate::validation::FieldErrors;

pub use accounts::{CmsUserDraft, ProviderDraft};
pub use content::{FaqDraft, HelpDraft, ServiceDetailDraft, TestimonialDraft};
pub use masters::{
    InsuranceCarrierDraft, InsuranceDraft, LanguageDraft, PractitionerServiceDraft,
    RelationDraft, SpecialtyDraft,
};
pub use subscription::SubscriptionDraft;

/// Whether a form creates a new record or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(RecordId),
}

impl FormMode {
    pub fn id(&self) -> Option<&RecordId> {
        match self {
            FormMode::Create => None,
            FormMode::Edit(id) => Some(id),
        }
    }

    pub fn is_create(&self) -> bool {
        matches!(self, FormMode::Create)
    }
}

/// A local, editable draft of one collection's record.
pub trait FormDraft {
    /// Collection the draft is saved into.
    const MODEL_NAME: &'static str;

    /// New records go through `auth/signUp` instead of the generic upsert.
    const SIGN_UP_ON_CREATE: bool = false;

    /// Every invalid field, each with the first rule it fails. Rules may
    /// differ between creating and editing.
    fn validate(&self, mode: &FormMode) -> FieldErrors;

    /// Fields sent for `mode`. Edits carry only what the form edits.
    fn input_data(&self, mode: &FormMode) -> Record;

    fn command(&self, mode: &FormMode) -> MutationCommand {
        MutationCommand {
            model_name: Self::MODEL_NAME.to_string(),
            id: mode.id().cloned(),
            input_data: self.input_data(mode),
        }
    }

    /// Validate, then build the command.
    fn prepare(&self, mode: &FormMode) -> Result<MutationCommand, FieldErrors> {
        self.validate(mode).into_result()?;
        Ok(self.command(mode))
    }
}
