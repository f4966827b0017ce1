//! REST client for the master-data endpoints.
//!
//! Wraps `masters/getMasterList`, `masters/createAndUpdateMaster` and
//! `auth/signUp` using [`reqwest`]. Each call is exactly one `POST`;
//! nothing here retries.

use serde::Serialize;

use carecms_core::mutation::MutationCommand;
use carecms_core::query::{ListResult, QueryDescriptor};
use carecms_core::types::Record;

use crate::config::ClientConfig;
use crate::envelope::Envelope;
use crate::error::ClientError;

pub const LIST_ENDPOINT: &str = "masters/getMasterList";
pub const UPSERT_ENDPOINT: &str = "masters/createAndUpdateMaster";
pub const SIGN_UP_ENDPOINT: &str = "auth/signUp";

/// HTTP client for one deployment of the master-data API.
#[derive(Debug, Clone)]
pub struct MasterApi {
    client: reqwest::Client,
    base_url: String,
}

impl MasterApi {
    /// Build a client with the configured per-request timeout.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self::with_client(client, config.base_url.clone()))
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    ///
    /// * `base_url` - Must end in `/`, e.g. `http://host/api/`.
    pub fn with_client(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// List Query Executor.
    ///
    /// Sends the descriptor verbatim and returns the page plus the total
    /// count. A page longer than the requested page size is truncated.
    pub async fn list(&self, query: &QueryDescriptor) -> Result<ListResult, ClientError> {
        tracing::debug!(
            model_name = %query.model_name,
            page = query.pagination.map(|p| p.page()),
            page_size = query.pagination.map(|p| p.page_size()),
            keyword = query.keyword(),
            "Listing records",
        );

        let (status, envelope) = self.post(LIST_ENDPOINT, query).await?;
        let mut rows = envelope.rows(status)?;
        let count = envelope.total_count(rows.len() as u64);

        if let Some(pagination) = query.pagination {
            let limit = pagination.page_size() as usize;
            if rows.len() > limit {
                tracing::warn!(
                    model_name = %query.model_name,
                    returned = rows.len(),
                    page_size = limit,
                    "Collaborator returned more rows than requested, truncating",
                );
                rows.truncate(limit);
            }
        }

        Ok(ListResult { rows, count })
    }

    /// Mutation Executor. Returns the persisted record.
    pub async fn upsert(&self, command: &MutationCommand) -> Result<Record, ClientError> {
        tracing::debug!(
            model_name = %command.model_name,
            id = ?command.id,
            fields = command.input_data.len(),
            "Saving record",
        );

        let (status, envelope) = self.post(UPSERT_ENDPOINT, command).await?;
        let record = envelope.record(status)?;

        tracing::info!(
            model_name = %command.model_name,
            created = command.is_create(),
            "Record saved",
        );
        Ok(record)
    }

    /// Register a new account through `auth/signUp`.
    pub async fn sign_up(&self, command: &MutationCommand) -> Result<(), ClientError> {
        tracing::debug!(model_name = %command.model_name, "Signing up account");
        self.post(SIGN_UP_ENDPOINT, command).await?;
        tracing::info!(model_name = %command.model_name, "Account signed up");
        Ok(())
    }

    // ---- private helpers ----

    /// Send one `POST` and normalize the response into an [`Envelope`].
    async fn post<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<(u16, Envelope), ClientError> {
        let url = format!("{}{}", self.base_url, endpoint);

        let response = match self.client.post(&url).json(body).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(endpoint, error = %e, "Request failed");
                return Err(ClientError::Transport(e));
            }
        };

        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| {
            tracing::error!(endpoint, status, error = %e, "Failed to read response body");
            ClientError::Transport(e)
        })?;

        let outcome = Envelope::parse(status, &text).and_then(|e| e.into_outcome(status));
        match outcome {
            Ok(envelope) => Ok((status, envelope)),
            Err(e) => {
                tracing::warn!(endpoint, status, error = %e, "Collaborator signalled failure");
                Err(e)
            }
        }
    }
}
