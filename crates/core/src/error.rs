use crate::types::RecordId;
use crate::validation::FieldErrors;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Record not found: {model_name} with id {id}")]
    NotFound { model_name: String, id: RecordId },

    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}
