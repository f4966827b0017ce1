//! Form submission.
//!
//! A submit validates the draft, then issues exactly one mutation. While
//! it is in flight the form's submit control is disabled: a second submit
//! is refused with [`SubmitError::Busy`] instead of sending a duplicate.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use carecms_client::{ClientError, MasterGateway};
use carecms_core::forms::{FormDraft, FormMode};
use carecms_core::mutation::MutationCommand;
use carecms_core::types::Record;
use carecms_core::validation::FieldErrors;

use crate::notify::{Notification, NotificationBus};

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// The draft failed validation. Nothing was sent.
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// A submit from this form is already in flight.
    #[error("A submit is already in progress")]
    Busy,

    #[error(transparent)]
    Client(#[from] ClientError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Upsert succeeded; holds the persisted record.
    Saved(Record),
    /// Account created through the sign-up endpoint.
    SignedUp,
}

// ---------------------------------------------------------------------------
// In-flight guard
// ---------------------------------------------------------------------------

/// Tracks whether a submit is in flight. Clones share the flag.
#[derive(Debug, Clone, Default)]
pub struct SubmitGuard {
    busy: Arc<AtomicBool>,
}

/// Held for the duration of one submit; releases the guard on drop.
#[derive(Debug)]
pub struct SubmitPermit {
    busy: Arc<AtomicBool>,
}

impl SubmitGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// `None` while another submit holds the guard.
    pub fn try_acquire(&self) -> Option<SubmitPermit> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SubmitPermit {
                busy: Arc::clone(&self.busy),
            })
    }
}

impl Drop for SubmitPermit {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

// ---------------------------------------------------------------------------
// Submitter
// ---------------------------------------------------------------------------

/// Submits drafts for one form.
pub struct FormSubmitter<G> {
    gateway: G,
    guard: SubmitGuard,
    notifications: NotificationBus,
}

impl<G: MasterGateway> FormSubmitter<G> {
    pub fn new(gateway: G, notifications: NotificationBus) -> Self {
        Self {
            gateway,
            guard: SubmitGuard::new(),
            notifications,
        }
    }

    /// Whether the submit control should currently be disabled.
    pub fn is_busy(&self) -> bool {
        self.guard.is_busy()
    }

    pub fn guard(&self) -> &SubmitGuard {
        &self.guard
    }

    /// Validate `draft` and save it.
    ///
    /// Validation failures return every field error and send nothing.
    /// Server and transport failures leave the draft untouched so the
    /// user can retry; both outcomes are published as notifications.
    pub async fn submit<D: FormDraft>(
        &self,
        draft: &D,
        mode: &FormMode,
    ) -> Result<(MutationCommand, SubmitOutcome), SubmitError> {
        let Some(_permit) = self.guard.try_acquire() else {
            tracing::debug!(model_name = D::MODEL_NAME, "Submit ignored, already in flight");
            return Err(SubmitError::Busy);
        };

        let command = draft.prepare(mode).map_err(SubmitError::Validation)?;
        let sign_up = mode.is_create() && D::SIGN_UP_ON_CREATE;

        tracing::info!(
            model_name = D::MODEL_NAME,
            id = ?command.id,
            sign_up,
            "Submitting form",
        );

        let result = if sign_up {
            self.gateway
                .sign_up(&command)
                .await
                .map(|()| SubmitOutcome::SignedUp)
        } else {
            self.gateway.upsert(&command).await.map(SubmitOutcome::Saved)
        };

        match result {
            Ok(outcome) => {
                let text = if mode.is_create() {
                    "Record Created Successfully"
                } else {
                    "Record Updated Successfully"
                };
                self.notifications.publish(Notification::success(text));
                Ok((command, outcome))
            }
            Err(e) => {
                tracing::warn!(model_name = D::MODEL_NAME, error = %e, "Submit failed");
                self.notifications
                    .publish(Notification::error(e.user_message()));
                Err(SubmitError::Client(e))
            }
        }
    }
}
