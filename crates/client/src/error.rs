//! Errors surfaced by the executors.

/// Fallback shown when the collaborator gives no usable message.
pub const GENERIC_FAILURE_MESSAGE: &str = "An error occurred. Please try again later.";

/// Shown for requests that never reached the collaborator.
pub const TRANSPORT_FAILURE_MESSAGE: &str =
    "Unable to reach the server. Please check your connection and try again.";

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request could not be sent or timed out. Safe to retry by
    /// re-invoking the same action.
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The collaborator answered but signalled failure, either with a
    /// non-2xx status or through the `code`/`status` body markers.
    #[error("Server error ({}): {}", display_status(.status), .message.as_deref().unwrap_or("no message"))]
    Server {
        status: Option<u16>,
        message: Option<String>,
    },

    /// The body could not be understood.
    #[error("Malformed response ({}): {detail}", display_status(.status))]
    MalformedResponse { status: Option<u16>, detail: String },
}

fn display_status(status: &Option<u16>) -> String {
    status.map_or_else(|| "no status".to_string(), |s| s.to_string())
}

impl ClientError {
    /// Text for a user-facing notification.
    pub fn user_message(&self) -> &str {
        match self {
            ClientError::Transport(_) => TRANSPORT_FAILURE_MESSAGE,
            ClientError::Server {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message,
            ClientError::Server { .. } | ClientError::MalformedResponse { .. } => {
                GENERIC_FAILURE_MESSAGE
            }
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }
}
