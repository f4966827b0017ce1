//! Trait seam between screens and the HTTP client.
//!
//! Controllers and flows are generic over [`MasterGateway`] so they can
//! run against [`MasterApi`] in production and an in-memory fake in
//! tests.

use std::sync::Arc;

use async_trait::async_trait;

use carecms_core::mutation::MutationCommand;
use carecms_core::query::{ListResult, QueryDescriptor};
use carecms_core::types::Record;

use crate::api::MasterApi;
use crate::error::ClientError;

#[async_trait]
pub trait MasterGateway: Send + Sync {
    /// Fetch one page of rows plus the total count.
    async fn list(&self, query: &QueryDescriptor) -> Result<ListResult, ClientError>;

    /// Create or update a record and return it as persisted.
    async fn upsert(&self, command: &MutationCommand) -> Result<Record, ClientError>;

    /// Register a new account.
    async fn sign_up(&self, command: &MutationCommand) -> Result<(), ClientError>;
}

#[async_trait]
impl MasterGateway for MasterApi {
    async fn list(&self, query: &QueryDescriptor) -> Result<ListResult, ClientError> {
        MasterApi::list(self, query).await
    }

    async fn upsert(&self, command: &MutationCommand) -> Result<Record, ClientError> {
        MasterApi::upsert(self, command).await
    }

    async fn sign_up(&self, command: &MutationCommand) -> Result<(), ClientError> {
        MasterApi::sign_up(self, command).await
    }
}

#[async_trait]
impl<G: MasterGateway + ?Sized> MasterGateway for Arc<G> {
    async fn list(&self, query: &QueryDescriptor) -> Result<ListResult, ClientError> {
        (**self).list(query).await
    }

    async fn upsert(&self, command: &MutationCommand) -> Result<Record, ClientError> {
        (**self).upsert(command).await
    }

    async fn sign_up(&self, command: &MutationCommand) -> Result<(), ClientError> {
        (**self).sign_up(command).await
    }
}
