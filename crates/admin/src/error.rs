use carecms_client::ClientError;
use carecms_core::error::CoreError;

/// Errors from loading detail views and lookups.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl LoadError {
    /// Text suitable for an error notification.
    pub fn user_message(&self) -> String {
        match self {
            LoadError::Client(e) => e.user_message().to_string(),
            LoadError::Core(e) => e.to_string(),
        }
    }
}
