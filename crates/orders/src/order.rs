use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use canteen_core::{CustomerId, ItemId, OrderId};

use crate::status::OrderStatus;

/// How the order was paid before the engine was invoked.
///
/// The gateway itself is external; the engine only records the tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Online,
    Cash,
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Online
    }
}

/// One line of an order: a snapshot of the catalog entry taken at
/// reservation time. Later catalog edits never reach back into this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub item_id: ItemId,
    pub name: String,
    /// Unit price in smallest currency unit, captured at reservation.
    pub unit_price: u64,
    pub quantity: u32,
}

impl OrderLine {
    pub fn amount(&self) -> u64 {
        self.unit_price.saturating_mul(u64::from(self.quantity))
    }
}

/// A placed order.
///
/// Created only by the reservation coordinator once every line is reserved;
/// `status` moves only through the validator, and `total_amount` is fixed at
/// placement (it always equals the sum over the lines).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub lines: Vec<OrderLine>,
    pub total_amount: u64,
    /// Short spoken pickup code; collisions between open orders are accepted.
    pub token: String,
    pub payment_id: String,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Stamped exactly once, by the transition into `collected`.
    pub collected_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_amount_is_price_times_quantity() {
        let line = OrderLine {
            item_id: ItemId::new(),
            name: "Dosa".to_string(),
            unit_price: 50,
            quantity: 3,
        };
        assert_eq!(line.amount(), 150);
    }

    #[test]
    fn payment_method_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Cash).unwrap(),
            "\"cash\""
        );
    }
}
