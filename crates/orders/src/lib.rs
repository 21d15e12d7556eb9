//! `canteen-orders` — the inventory-backed order lifecycle engine.
//!
//! - [`status`]: the fixed fulfilment state machine.
//! - [`token`]: pickup tokens and payment-correlation ids.
//! - [`ledger`]: the persisted set of orders.
//! - [`coordinator`]: the reserve-all-or-release-all placement saga and its
//!   compensating cancel/delete paths.

pub mod coordinator;
pub mod ledger;
pub mod order;
pub mod status;
pub mod token;

pub use coordinator::{PlacementLine, PlacementReceipt, Requester, ReservationCoordinator};
pub use ledger::{LedgerStats, OrderLedger};
pub use order::{Order, OrderLine, PaymentMethod};
pub use status::OrderStatus;
pub use token::TokenIssuer;
