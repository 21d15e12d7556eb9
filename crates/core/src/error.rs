//! Engine error model.
//!
//! Keep this focused on deterministic, per-request failures: every variant is
//! reported synchronously to the caller and none is fatal to the process.
//! Infrastructure concerns (HTTP status codes, JSON envelopes) belong to the
//! API layer.

use thiserror::Error;

use crate::id::ItemId;

/// Result type used across the engine.
pub type EngineResult<T> = Result<T, EngineError>;

/// Engine-level error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Malformed input (empty line list, zero quantity, bad identifier, ...).
    #[error("validation failed: {0}")]
    Validation(String),

    /// The referenced catalog item does not exist.
    #[error("item not found: {item_id}")]
    ItemNotFound { item_id: ItemId },

    /// A reservation asked for more units than the item has left.
    #[error("insufficient stock for item {item_id}: requested {requested}, available {available}")]
    InsufficientStock {
        item_id: ItemId,
        requested: u32,
        available: u32,
    },

    /// The referenced order does not exist (or is not visible to the caller).
    #[error("order not found")]
    OrderNotFound,

    /// A status write outside the forward chain of the state machine.
    #[error("illegal status transition: {from} -> {to}")]
    IllegalTransition {
        from: &'static str,
        to: &'static str,
    },

    /// Cancellation requested after the order left its cancellable window.
    #[error("order in status '{status}' can no longer be cancelled")]
    OrderNotCancellable { status: &'static str },

    /// The caller presented no valid identity.
    #[error("unauthenticated")]
    Unauthenticated,
}

impl EngineError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn item_not_found(item_id: ItemId) -> Self {
        Self::ItemNotFound { item_id }
    }

    pub fn insufficient_stock(item_id: ItemId, requested: u32, available: u32) -> Self {
        Self::InsufficientStock {
            item_id,
            requested,
            available,
        }
    }
}
