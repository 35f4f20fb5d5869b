use std::io;

use thiserror::Error;

use super::event::EventId;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no event with id {0}")]
    NotFound(EventId),

    #[error("invalid {field}: {reason}")]
    Validation {
        field: &'static str,
        reason: &'static str,
    },

    #[error("no event ids left")]
    IdsExhausted,

    #[error("failed to save events: {0}")]
    Save(#[from] io::Error),

    #[error("failed to serialize events: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
