//! `canteen-core` — shared identifiers and the engine error model.
//!
//! Everything here is deterministic and IO-free; the stateful pieces live in
//! `canteen-catalog` (stock counters) and `canteen-orders` (ledger).

pub mod error;
pub mod id;

pub use error::{EngineError, EngineResult};
pub use id::{CustomerId, ItemId, OrderId};
