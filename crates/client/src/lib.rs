//! HTTP client for the generic master-data API.
//!
//! Every request is a single `POST` with a JSON body. Responses are
//! normalized at this boundary: the collaborator's mix of `code` and
//! `status` success markers never leaves the crate, callers only see
//! `Result<T, ClientError>`.

pub mod api;
pub mod config;
pub mod envelope;
pub mod error;
pub mod gateway;

pub use api::MasterApi;
pub use config::{ApiEnvironment, ClientConfig, ConfigError};
pub use error::ClientError;
pub use gateway::MasterGateway;
