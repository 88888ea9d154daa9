//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// state machine violations, capacity accounting). Infrastructure concerns
/// belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A requested record was not found.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// An operation was attempted from a non-permitted lifecycle state.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A reservation asked for more quantity than the batch has left.
    #[error("insufficient quantity: requested {requested}, available {available}")]
    CapacityExceeded { requested: u32, available: u32 },

    /// A reservation was attempted outside an offer's active window.
    #[error("offer not active: {0}")]
    OfferInactive(String),

    /// A uniqueness constraint was violated.
    ///
    /// Confirmation-code collisions are retried locally and only surface
    /// through this variant once the bounded retry loop exhausts.
    #[error("uniqueness conflict: {0}")]
    UniquenessConflict(String),

    /// A time window was empty or inverted (start must precede end).
    #[error("invalid window: {0}")]
    InvalidWindow(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound(entity)
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn offer_inactive(msg: impl Into<String>) -> Self {
        Self::OfferInactive(msg.into())
    }

    pub fn uniqueness_conflict(msg: impl Into<String>) -> Self {
        Self::UniquenessConflict(msg.into())
    }

    pub fn invalid_window(msg: impl Into<String>) -> Self {
        Self::InvalidWindow(msg.into())
    }
}
