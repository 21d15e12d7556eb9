//! Fulfilment status state machine.
//!
//! Orders only move forward: `confirmed → preparing → ready → collected`.
//! Cancellation is not a status — it removes the order from the ledger and
//! is legal only while the order is still in the kitchen's inbox.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use canteen_core::{EngineError, EngineResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Confirmed,
    Preparing,
    Ready,
    Collected,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Collected => "collected",
        }
    }

    /// The single legal successor, if any.
    pub fn next(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Confirmed => Some(OrderStatus::Preparing),
            OrderStatus::Preparing => Some(OrderStatus::Ready),
            OrderStatus::Ready => Some(OrderStatus::Collected),
            OrderStatus::Collected => None,
        }
    }

    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        self.next() == Some(next)
    }

    /// Cancellation window: once the counter has the order `ready`, the food
    /// is made and the customer is expected to collect it.
    pub fn is_cancellable(self) -> bool {
        matches!(self, OrderStatus::Confirmed | OrderStatus::Preparing)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Collected)
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confirmed" => Ok(OrderStatus::Confirmed),
            "preparing" => Ok(OrderStatus::Preparing),
            "ready" => Ok(OrderStatus::Ready),
            "collected" => Ok(OrderStatus::Collected),
            other => Err(EngineError::validation(format!(
                "unknown order status '{other}'"
            ))),
        }
    }
}

/// Reject any status write outside the forward chain.
pub fn validate_transition(from: OrderStatus, to: OrderStatus) -> EngineResult<()> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(EngineError::IllegalTransition {
            from: from.as_str(),
            to: to.as_str(),
        })
    }
}
