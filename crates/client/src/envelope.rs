//! Response envelope shared by every collaborator endpoint.
//!
//! Endpoints disagree on how they report success: some send
//! `code: 1`, some `status: 200` or `201`, some only an HTTP status.
//! [`Envelope::into_outcome`] folds all of them into one `Result`.

use serde::Deserialize;
use serde_json::Value;

use carecms_core::types::Record;

use crate::error::ClientError;

/// `code` value meaning success.
pub const SUCCESS_CODE: i64 = 1;

/// Body-level `status` values meaning success.
pub const SUCCESS_STATUSES: &[i64] = &[200, 201];

/// Raw response body. Every field is optional on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub count: Value,
    #[serde(default)]
    pub status: Option<Value>,
    #[serde(default)]
    pub code: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Read an integer that may arrive as a number or a numeric string.
fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl Envelope {
    /// Parse a response body received with `http_status`.
    pub fn parse(http_status: u16, body: &str) -> Result<Self, ClientError> {
        if body.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(body).map_err(|e| ClientError::MalformedResponse {
            status: Some(http_status),
            detail: e.to_string(),
        })
    }

    /// Whether the body itself signals failure.
    ///
    /// A present `code` must equal [`SUCCESS_CODE`]; a present `status`
    /// must be one of [`SUCCESS_STATUSES`]. Absent markers are neutral.
    pub fn signals_failure(&self) -> bool {
        let code_failed = self
            .code
            .as_ref()
            .filter(|v| !v.is_null())
            .is_some_and(|v| as_int(v) != Some(SUCCESS_CODE));
        let status_failed = self
            .status
            .as_ref()
            .filter(|v| !v.is_null())
            .is_some_and(|v| !as_int(v).is_some_and(|s| SUCCESS_STATUSES.contains(&s)));
        code_failed || status_failed
    }

    /// Fold HTTP status and body markers into one outcome.
    pub fn into_outcome(self, http_status: u16) -> Result<Self, ClientError> {
        let http_ok = (200..300).contains(&http_status);
        if !http_ok || self.signals_failure() {
            let status = self
                .status
                .as_ref()
                .and_then(as_int)
                .and_then(|s| u16::try_from(s).ok())
                .filter(|_| http_ok)
                .or(Some(http_status));
            return Err(ClientError::Server {
                status,
                message: self.message,
            });
        }
        Ok(self)
    }

    /// Rows of a list response. A missing or `null` `data` is an empty page.
    pub fn rows(&self, http_status: u16) -> Result<Vec<Record>, ClientError> {
        match &self.data {
            Value::Null => Ok(Vec::new()),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::Object(map) => Ok(map.clone()),
                    other => Err(ClientError::MalformedResponse {
                        status: Some(http_status),
                        detail: format!("expected a record, got {other}"),
                    }),
                })
                .collect(),
            other => Err(ClientError::MalformedResponse {
                status: Some(http_status),
                detail: format!("expected a list of records, got {other}"),
            }),
        }
    }

    /// Total row count of a list response, falling back to `fallback`
    /// when the collaborator omits it.
    pub fn total_count(&self, fallback: u64) -> u64 {
        as_int(&self.count)
            .and_then(|n| u64::try_from(n).ok())
            .unwrap_or(fallback)
    }

    /// The single record of a mutation response.
    pub fn record(self, http_status: u16) -> Result<Record, ClientError> {
        match self.data {
            Value::Object(map) => Ok(map),
            other => Err(ClientError::MalformedResponse {
                status: Some(http_status),
                detail: format!("expected the saved record, got {other}"),
            }),
        }
    }
}
