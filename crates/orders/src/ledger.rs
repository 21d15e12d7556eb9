//! The order ledger: the persisted set of orders.
//!
//! All writes funnel through the coordinator and the status validator; no
//! other component mutates `status` or the line list.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use canteen_core::{CustomerId, EngineError, EngineResult, OrderId};

use crate::order::Order;
use crate::status::{self, OrderStatus};

/// Read-only aggregation over the ledger for the admin surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct LedgerStats {
    pub total_orders: usize,
    /// `confirmed` or `preparing`.
    pub pending_orders: usize,
    pub ready_orders: usize,
    /// Sum of `total_amount` over `collected` orders.
    pub collected_revenue: u64,
}

#[derive(Debug, Default)]
pub struct OrderLedger {
    orders: RwLock<HashMap<OrderId, Order>>,
}

impl OrderLedger {
    pub fn new() -> Self {
        Self {
            orders: RwLock::new(HashMap::new()),
        }
    }

    /// Append a freshly placed order. Only the coordinator calls this.
    pub(crate) fn insert(&self, order: Order) -> EngineResult<()> {
        let mut map = self.orders.write().map_err(|_| lock_poisoned())?;
        if map.contains_key(&order.id) {
            return Err(EngineError::validation("duplicate order id"));
        }
        map.insert(order.id, order);
        Ok(())
    }

    pub fn get(&self, order_id: OrderId) -> Option<Order> {
        let map = self.orders.read().ok()?;
        map.get(&order_id).cloned()
    }

    /// Token lookup. Tokens are low-cardinality by design; on a collision
    /// the most recently created open order wins.
    pub fn find_by_token(&self, token: &str) -> Option<Order> {
        let map = self.orders.read().ok()?;
        map.values()
            .filter(|o| o.token == token)
            .max_by_key(|o| o.created_at)
            .cloned()
    }

    /// A customer's order history, most recent first.
    pub fn history_for(&self, customer_id: CustomerId) -> Vec<Order> {
        let map = match self.orders.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };
        let mut orders: Vec<Order> = map
            .values()
            .filter(|o| o.customer_id == customer_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        orders
    }

    /// All orders, most recent first.
    pub fn list_all(&self) -> Vec<Order> {
        let map = match self.orders.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };
        let mut orders: Vec<Order> = map.values().cloned().collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        orders
    }

    /// Validator-gated status write, atomic under the ledger lock.
    ///
    /// Moving into `collected` stamps `collected_at` — the only status write
    /// with a side effect beyond the field itself.
    pub fn update_status(
        &self,
        token: &str,
        new_status: OrderStatus,
        now: DateTime<Utc>,
    ) -> EngineResult<Order> {
        let mut map = self.orders.write().map_err(|_| lock_poisoned())?;
        let id = map
            .values()
            .filter(|o| o.token == token)
            .max_by_key(|o| o.created_at)
            .map(|o| o.id)
            .ok_or(EngineError::OrderNotFound)?;

        let order = map.get_mut(&id).ok_or(EngineError::OrderNotFound)?;
        status::validate_transition(order.status, new_status)?;

        order.status = new_status;
        order.updated_at = now;
        if new_status == OrderStatus::Collected {
            order.collected_at = Some(now);
        }
        Ok(order.clone())
    }

    /// Remove an order once `check` accepts it, atomically.
    ///
    /// The order is taken out of the ledger before any stock is released, so
    /// a racing second cancel observes `OrderNotFound` instead of releasing
    /// the same lines twice.
    pub(crate) fn remove_if<F>(&self, order_id: OrderId, check: F) -> EngineResult<Order>
    where
        F: FnOnce(&Order) -> EngineResult<()>,
    {
        let mut map = self.orders.write().map_err(|_| lock_poisoned())?;
        match map.entry(order_id) {
            Entry::Occupied(entry) => {
                check(entry.get())?;
                Ok(entry.remove())
            }
            Entry::Vacant(_) => Err(EngineError::OrderNotFound),
        }
    }

    /// Token-keyed variant of [`Self::remove_if`] (administrative paths).
    pub(crate) fn remove_by_token_if<F>(&self, token: &str, check: F) -> EngineResult<Order>
    where
        F: FnOnce(&Order) -> EngineResult<()>,
    {
        let mut map = self.orders.write().map_err(|_| lock_poisoned())?;
        let id = map
            .values()
            .filter(|o| o.token == token)
            .max_by_key(|o| o.created_at)
            .map(|o| o.id)
            .ok_or(EngineError::OrderNotFound)?;
        match map.entry(id) {
            Entry::Occupied(entry) => {
                check(entry.get())?;
                Ok(entry.remove())
            }
            Entry::Vacant(_) => Err(EngineError::OrderNotFound),
        }
    }

    pub fn stats(&self) -> LedgerStats {
        let map = match self.orders.read() {
            Ok(m) => m,
            Err(_) => {
                return LedgerStats {
                    total_orders: 0,
                    pending_orders: 0,
                    ready_orders: 0,
                    collected_revenue: 0,
                }
            }
        };

        let mut stats = LedgerStats {
            total_orders: map.len(),
            pending_orders: 0,
            ready_orders: 0,
            collected_revenue: 0,
        };
        for order in map.values() {
            match order.status {
                OrderStatus::Confirmed | OrderStatus::Preparing => stats.pending_orders += 1,
                OrderStatus::Ready => stats.ready_orders += 1,
                OrderStatus::Collected => {
                    stats.collected_revenue =
                        stats.collected_revenue.saturating_add(order.total_amount)
                }
            }
        }
        stats
    }
}

fn lock_poisoned() -> EngineError {
    EngineError::validation("ledger lock poisoned")
}
