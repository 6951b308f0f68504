//! Recommendation error types.

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::rules::RulesError;

/// Message returned to callers for failures that must not leak internals.
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal server error occurred.";

/// Errors that can occur while producing a recommendation.
///
/// The two "no match" outcomes are not errors; see [`crate::RecommendOutcome`].
#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("rule tables error: {0}")]
    Rules(#[from] RulesError),

    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

impl RecommendError {
    /// True when the caller supplied a bad request
    pub fn is_client_error(&self) -> bool {
        matches!(self, RecommendError::InvalidInput(_))
    }

    pub fn code(&self) -> &'static str {
        if self.is_client_error() {
            "invalid_input"
        } else {
            "internal_error"
        }
    }

    /// Message safe to show to the caller
    pub fn public_message(&self) -> String {
        match self {
            RecommendError::InvalidInput(msg) => msg.clone(),
            _ => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }
}

pub type RecommendResult<T> = Result<T, RecommendError>;
