//! Error type shared by every servicehub crate.

use rust_decimal::Decimal;
use thiserror::Error;

/// Result type alias using the marketplace error type.
pub type Result<T> = std::result::Result<T, MarketError>;

/// Local validation failures. None of these are retried; callers surface them
/// to the user and carry on.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketError {
    /// A required request field was absent or blank
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Phone number is not 7-15 digits
    #[error("Invalid phone number: {0}")]
    InvalidPhone(String),

    /// Negative job price
    #[error("Invalid amount: {0}")]
    InvalidAmount(Decimal),

    /// Commission rate outside 0..=1
    #[error("Invalid commission rate: {0} (expected a fraction between 0 and 1)")]
    InvalidCommissionRate(Decimal),

    /// Settlement hold is negative or too long to add to a timestamp
    #[error("Invalid settlement hold: {0}")]
    InvalidSettlementHold(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// Edge not present in the lifecycle graph
    #[error("Invalid transition from '{from}' to '{to}'")]
    InvalidTransition { from: String, to: String },

    /// The record is in a state that does not permit the operation
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A wallet transaction already exists for this job
    #[error("Ledger entry already exists for job {0}")]
    DuplicateLedgerEntry(String),

    /// A request with this id already exists
    #[error("Request already exists: {0}")]
    DuplicateRequest(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl MarketError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        MarketError::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn invalid_transition(from: impl ToString, to: impl ToString) -> Self {
        MarketError::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

impl From<serde_json::Error> for MarketError {
    fn from(err: serde_json::Error) -> Self {
        MarketError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_transition_names_both_states() {
        let err = MarketError::invalid_transition("completed", "pending");
        assert_eq!(
            err.to_string(),
            "Invalid transition from 'completed' to 'pending'"
        );
    }

    #[test]
    fn test_not_found_message() {
        let err = MarketError::not_found("Service request", "REQ-1");
        assert_eq!(err.to_string(), "Service request not found: REQ-1");
    }
}
