//! Reservation coordinator: the "reserve every line or release them all"
//! saga for placement, and its compensating cancel/delete paths.
//!
//! Placement never persists a half-reserved order: the order is appended to
//! the ledger only after the last line's reservation commits, so a concurrent
//! cancel either sees the whole order or none of it.

use std::sync::Arc;

use chrono::Utc;

use canteen_catalog::{CatalogStore, Released, Reservation};
use canteen_core::{CustomerId, EngineError, EngineResult, ItemId, OrderId};

use crate::ledger::OrderLedger;
use crate::order::{Order, OrderLine, PaymentMethod};
use crate::status::OrderStatus;
use crate::token::TokenIssuer;

/// One requested line of a placement: which item, how many.
///
/// `expected_unit_price` is what the client believed the price to be; it is
/// accepted for display-layer diffing but the charged total always comes
/// from the catalog price captured at reservation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementLine {
    pub item_id: ItemId,
    pub quantity: u32,
    pub expected_unit_price: Option<u64>,
}

/// What the caller gets back from a successful placement.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct PlacementReceipt {
    pub order_id: OrderId,
    pub token: String,
    pub payment_id: String,
    pub total_amount: u64,
}

/// Who is asking for a cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requester {
    Customer(CustomerId),
    Admin,
}

/// Orchestrates multi-item stock reservation against the catalog and order
/// persistence in the ledger.
pub struct ReservationCoordinator {
    catalog: Arc<CatalogStore>,
    ledger: Arc<OrderLedger>,
    tokens: TokenIssuer,
}

impl ReservationCoordinator {
    pub fn new(catalog: Arc<CatalogStore>, ledger: Arc<OrderLedger>) -> Self {
        Self {
            catalog,
            ledger,
            tokens: TokenIssuer::new(),
        }
    }

    /// Place an order: reserve every line or leave the catalog untouched.
    ///
    /// Reservations are attempted in input order and recorded as they
    /// commit; the first failure replays releases for exactly the recorded
    /// list (in reverse) and surfaces that line's specific error. Only after
    /// every reservation holds is the order written to the ledger, in status
    /// `confirmed`.
    pub fn place_order(
        &self,
        customer_id: CustomerId,
        lines: &[PlacementLine],
        payment_method: PaymentMethod,
    ) -> EngineResult<PlacementReceipt> {
        if lines.is_empty() {
            return Err(EngineError::validation("order must contain at least one line"));
        }
        if lines.iter().any(|l| l.quantity == 0) {
            return Err(EngineError::validation("quantity must be positive"));
        }

        let mut reserved: Vec<Reservation> = Vec::with_capacity(lines.len());
        for line in lines {
            match self.catalog.try_reserve(line.item_id, line.quantity) {
                Ok(reservation) => reserved.push(reservation),
                Err(err) => {
                    self.release_all(&reserved);
                    return Err(err);
                }
            }
        }

        let order_lines: Vec<OrderLine> = reserved
            .iter()
            .map(|r| OrderLine {
                item_id: r.item_id,
                name: r.name.clone(),
                unit_price: r.unit_price,
                quantity: r.quantity,
            })
            .collect();

        let mut total_amount: u64 = 0;
        for line in &order_lines {
            let amount = u64::from(line.quantity)
                .checked_mul(line.unit_price)
                .and_then(|a| total_amount.checked_add(a));
            match amount {
                Some(a) => total_amount = a,
                None => {
                    self.release_all(&reserved);
                    return Err(EngineError::validation("order total overflows"));
                }
            }
        }

        let now = Utc::now();
        let order = Order {
            id: OrderId::new(),
            customer_id,
            lines: order_lines,
            total_amount,
            token: self.tokens.issue_order_token(),
            payment_id: self.tokens.issue_payment_id(),
            payment_method,
            status: OrderStatus::Confirmed,
            created_at: now,
            updated_at: now,
            collected_at: None,
        };

        let receipt = PlacementReceipt {
            order_id: order.id,
            token: order.token.clone(),
            payment_id: order.payment_id.clone(),
            total_amount,
        };

        if let Err(err) = self.ledger.insert(order) {
            // Ledger refused the append (duplicate id); undo the decrement.
            self.release_all(&reserved);
            return Err(err);
        }

        tracing::info!(
            order_id = %receipt.order_id,
            token = %receipt.token,
            total_amount,
            "order placed"
        );
        Ok(receipt)
    }

    /// Validator-gated status change, looked up by pickup token.
    pub fn set_status(&self, token: &str, new_status: OrderStatus) -> EngineResult<Order> {
        let order = self.ledger.update_status(token, new_status, Utc::now())?;
        tracing::info!(order_id = %order.id, status = %order.status, "order status changed");
        Ok(order)
    }

    /// Cancel an order and restore its stock.
    ///
    /// Legal only while the status is still cancellable, and only for the
    /// owning customer (admins may cancel anyone's). An order the requester
    /// does not own is reported as not found rather than leaking existence.
    pub fn cancel_order(&self, order_id: OrderId, requester: Requester) -> EngineResult<()> {
        let order = self.ledger.remove_if(order_id, |order| {
            if let Requester::Customer(customer_id) = requester {
                if order.customer_id != customer_id {
                    return Err(EngineError::OrderNotFound);
                }
            }
            if !order.status.is_cancellable() {
                return Err(EngineError::OrderNotCancellable {
                    status: order.status.as_str(),
                });
            }
            Ok(())
        })?;

        self.release_lines(&order);
        tracing::info!(order_id = %order.id, token = %order.token, "order cancelled, stock restored");
        Ok(())
    }

    /// Administrative deletion by token.
    ///
    /// Unlike cancellation this is permitted from any status; stock is only
    /// restored when the order never reached `collected` (a collected
    /// order's items were already consumed).
    pub fn delete_order(&self, token: &str) -> EngineResult<Order> {
        let order = self.ledger.remove_by_token_if(token, |_| Ok(()))?;

        if order.status != OrderStatus::Collected {
            self.release_lines(&order);
        }
        tracing::info!(order_id = %order.id, token = %order.token, status = %order.status, "order deleted");
        Ok(order)
    }

    /// Compensation for a partially reserved placement: undo exactly the
    /// reservations recorded so far, most recent first.
    fn release_all(&self, reserved: &[Reservation]) {
        for r in reserved.iter().rev() {
            self.catalog.release(r.item_id, r.quantity);
        }
    }

    /// Best-effort per-line release for cancellation/deletion. Items missing
    /// from the catalog are logged by the store and skipped; the remaining
    /// lines are still released.
    fn release_lines(&self, order: &Order) {
        for line in &order.lines {
            if let Released::ItemGone = self.catalog.release(line.item_id, line.quantity) {
                tracing::warn!(
                    order_id = %order.id,
                    item_id = %line.item_id,
                    quantity = line.quantity,
                    "stock not restored for cancelled line"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canteen_catalog::MenuItemDraft;
    use std::thread;

    struct Fixture {
        catalog: Arc<CatalogStore>,
        ledger: Arc<OrderLedger>,
        coordinator: ReservationCoordinator,
    }

    fn fixture() -> Fixture {
        let catalog = Arc::new(CatalogStore::new());
        let ledger = Arc::new(OrderLedger::new());
        let coordinator = ReservationCoordinator::new(catalog.clone(), ledger.clone());
        Fixture {
            catalog,
            ledger,
            coordinator,
        }
    }

    fn seed(fx: &Fixture, name: &str, price: u64, stock: u32) -> ItemId {
        fx.catalog
            .add_item(MenuItemDraft {
                name: name.to_string(),
                price,
                stock,
                category: "maincourse".to_string(),
                image: None,
            })
            .unwrap()
            .id
    }

    fn line(item_id: ItemId, quantity: u32) -> PlacementLine {
        PlacementLine {
            item_id,
            quantity,
            expected_unit_price: None,
        }
    }

    #[test]
    fn successful_placement_reserves_and_records_one_confirmed_order() {
        let fx = fixture();
        let a = seed(&fx, "A", 10, 5);
        let c = seed(&fx, "C", 20, 3);
        let customer = CustomerId::new();

        let receipt = fx
            .coordinator
            .place_order(customer, &[line(a, 2), line(c, 1)], PaymentMethod::Online)
            .unwrap();

        assert_eq!(receipt.total_amount, 40);
        assert_eq!(fx.catalog.current_stock(a).unwrap(), 3);
        assert_eq!(fx.catalog.current_stock(c).unwrap(), 2);

        let order = fx.ledger.get(receipt.order_id).unwrap();
        assert_eq!(order.status, OrderStatus::Confirmed);
        assert_eq!(order.customer_id, customer);
        assert_eq!(order.total_amount, 40);
        assert_eq!(
            order.total_amount,
            order.lines.iter().map(|l| l.amount()).sum::<u64>()
        );
    }

    #[test]
    fn failing_line_rolls_back_every_prior_reservation() {
        let fx = fixture();
        let a = seed(&fx, "A", 10, 5);
        let b = seed(&fx, "B", 15, 0);

        let err = fx
            .coordinator
            .place_order(
                CustomerId::new(),
                &[line(a, 2), line(b, 1)],
                PaymentMethod::Online,
            )
            .unwrap_err();

        assert_eq!(err, EngineError::insufficient_stock(b, 1, 0));
        assert_eq!(fx.catalog.current_stock(a).unwrap(), 5);
        assert!(fx.ledger.list_all().is_empty());
    }

    #[test]
    fn unknown_item_fails_whole_placement() {
        let fx = fixture();
        let a = seed(&fx, "A", 10, 5);
        let ghost = ItemId::new();

        let err = fx
            .coordinator
            .place_order(
                CustomerId::new(),
                &[line(a, 1), line(ghost, 1)],
                PaymentMethod::Cash,
            )
            .unwrap_err();

        assert_eq!(err, EngineError::ItemNotFound { item_id: ghost });
        assert_eq!(fx.catalog.current_stock(a).unwrap(), 5);
        assert!(fx.ledger.list_all().is_empty());
    }

    #[test]
    fn empty_and_zero_quantity_orders_are_rejected() {
        let fx = fixture();
        let a = seed(&fx, "A", 10, 5);

        let err = fx
            .coordinator
            .place_order(CustomerId::new(), &[], PaymentMethod::Online)
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));

        let err = fx
            .coordinator
            .place_order(CustomerId::new(), &[line(a, 0)], PaymentMethod::Online)
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
        assert_eq!(fx.catalog.current_stock(a).unwrap(), 5);
    }

    #[test]
    fn total_ignores_caller_supplied_prices() {
        let fx = fixture();
        let a = seed(&fx, "A", 10, 5);

        let receipt = fx
            .coordinator
            .place_order(
                CustomerId::new(),
                &[PlacementLine {
                    item_id: a,
                    quantity: 2,
                    expected_unit_price: Some(1), // tampered
                }],
                PaymentMethod::Online,
            )
            .unwrap();

        assert_eq!(receipt.total_amount, 20);
    }

    #[test]
    fn cancel_restores_stock_and_removes_order() {
        let fx = fixture();
        let a = seed(&fx, "A", 10, 5);
        let c = seed(&fx, "C", 20, 3);
        let customer = CustomerId::new();

        let receipt = fx
            .coordinator
            .place_order(customer, &[line(a, 2), line(c, 1)], PaymentMethod::Online)
            .unwrap();

        fx.coordinator
            .cancel_order(receipt.order_id, Requester::Customer(customer))
            .unwrap();

        assert_eq!(fx.catalog.current_stock(a).unwrap(), 5);
        assert_eq!(fx.catalog.current_stock(c).unwrap(), 3);
        assert!(fx.ledger.list_all().is_empty());
    }

    #[test]
    fn cancel_by_another_customer_reports_not_found() {
        let fx = fixture();
        let a = seed(&fx, "A", 10, 5);
        let owner = CustomerId::new();

        let receipt = fx
            .coordinator
            .place_order(owner, &[line(a, 1)], PaymentMethod::Online)
            .unwrap();

        let err = fx
            .coordinator
            .cancel_order(receipt.order_id, Requester::Customer(CustomerId::new()))
            .unwrap_err();
        assert_eq!(err, EngineError::OrderNotFound);
        assert!(fx.ledger.get(receipt.order_id).is_some());
        assert_eq!(fx.catalog.current_stock(a).unwrap(), 4);
    }

    #[test]
    fn cancel_after_ready_fails_and_leaves_stock_alone() {
        let fx = fixture();
        let a = seed(&fx, "A", 10, 5);
        let customer = CustomerId::new();

        let receipt = fx
            .coordinator
            .place_order(customer, &[line(a, 2)], PaymentMethod::Online)
            .unwrap();
        fx.coordinator
            .set_status(&receipt.token, OrderStatus::Preparing)
            .unwrap();
        fx.coordinator
            .set_status(&receipt.token, OrderStatus::Ready)
            .unwrap();

        let err = fx
            .coordinator
            .cancel_order(receipt.order_id, Requester::Customer(customer))
            .unwrap_err();
        assert_eq!(err, EngineError::OrderNotCancellable { status: "ready" });
        assert_eq!(fx.catalog.current_stock(a).unwrap(), 3);
        assert!(fx.ledger.get(receipt.order_id).is_some());
    }

    #[test]
    fn admin_can_cancel_someone_elses_preparing_order() {
        let fx = fixture();
        let a = seed(&fx, "A", 10, 5);

        let receipt = fx
            .coordinator
            .place_order(CustomerId::new(), &[line(a, 2)], PaymentMethod::Cash)
            .unwrap();
        fx.coordinator
            .set_status(&receipt.token, OrderStatus::Preparing)
            .unwrap();

        fx.coordinator
            .cancel_order(receipt.order_id, Requester::Admin)
            .unwrap();
        assert_eq!(fx.catalog.current_stock(a).unwrap(), 5);
    }

    #[test]
    fn cancel_survives_item_deleted_from_catalog() {
        let fx = fixture();
        let a = seed(&fx, "A", 10, 5);
        let c = seed(&fx, "C", 20, 3);
        let customer = CustomerId::new();

        let receipt = fx
            .coordinator
            .place_order(customer, &[line(a, 1), line(c, 1)], PaymentMethod::Online)
            .unwrap();
        fx.catalog.remove_item(a).unwrap();

        // The missing item's stock is gone with it; the rest is restored and
        // the cancellation still succeeds.
        fx.coordinator
            .cancel_order(receipt.order_id, Requester::Customer(customer))
            .unwrap();
        assert_eq!(fx.catalog.current_stock(c).unwrap(), 3);
        assert!(fx.ledger.list_all().is_empty());
    }

    #[test]
    fn delete_before_collection_restores_stock() {
        let fx = fixture();
        let a = seed(&fx, "A", 10, 5);

        let receipt = fx
            .coordinator
            .place_order(CustomerId::new(), &[line(a, 2)], PaymentMethod::Online)
            .unwrap();
        fx.coordinator
            .set_status(&receipt.token, OrderStatus::Preparing)
            .unwrap();
        fx.coordinator
            .set_status(&receipt.token, OrderStatus::Ready)
            .unwrap();

        let deleted = fx.coordinator.delete_order(&receipt.token).unwrap();
        assert_eq!(deleted.id, receipt.order_id);
        assert_eq!(fx.catalog.current_stock(a).unwrap(), 5);
    }

    #[test]
    fn delete_after_collection_leaves_stock_consumed() {
        let fx = fixture();
        let a = seed(&fx, "A", 10, 5);

        let receipt = fx
            .coordinator
            .place_order(CustomerId::new(), &[line(a, 2)], PaymentMethod::Online)
            .unwrap();
        for status in [
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::Collected,
        ] {
            fx.coordinator.set_status(&receipt.token, status).unwrap();
        }

        let deleted = fx.coordinator.delete_order(&receipt.token).unwrap();
        assert_eq!(deleted.status, OrderStatus::Collected);
        assert!(deleted.collected_at.is_some());
        assert_eq!(fx.catalog.current_stock(a).unwrap(), 3);
    }

    #[test]
    fn double_cancel_releases_stock_exactly_once() {
        let fx = fixture();
        let a = seed(&fx, "A", 10, 5);
        let customer = CustomerId::new();

        let receipt = fx
            .coordinator
            .place_order(customer, &[line(a, 2)], PaymentMethod::Online)
            .unwrap();

        fx.coordinator
            .cancel_order(receipt.order_id, Requester::Customer(customer))
            .unwrap();
        let err = fx
            .coordinator
            .cancel_order(receipt.order_id, Requester::Customer(customer))
            .unwrap_err();
        assert_eq!(err, EngineError::OrderNotFound);
        assert_eq!(fx.catalog.current_stock(a).unwrap(), 5);
    }

    #[test]
    fn two_concurrent_placements_for_the_last_unit() {
        let fx = fixture();
        let a = seed(&fx, "A", 10, 1);
        let catalog = fx.catalog.clone();
        let ledger = fx.ledger.clone();

        let mut handles = Vec::new();
        for _ in 0..2 {
            let coordinator = ReservationCoordinator::new(catalog.clone(), ledger.clone());
            handles.push(thread::spawn(move || {
                coordinator
                    .place_order(CustomerId::new(), &[line(a, 1)], PaymentMethod::Online)
                    .is_ok()
            }));
        }
        let wins: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(wins.iter().filter(|w| **w).count(), 1);
        assert_eq!(fx.catalog.current_stock(a).unwrap(), 0);
        assert_eq!(fx.ledger.list_all().len(), 1);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: placement either decrements every requested item by
            /// exactly its quantity, or leaves all stock untouched. Never
            /// anything in between.
            #[test]
            fn placement_is_all_or_nothing(
                stocks in proptest::collection::vec(0u32..6, 2..5),
                quantities in proptest::collection::vec(1u32..4, 2..5),
            ) {
                let fx = fixture();
                let n = stocks.len().min(quantities.len());

                let mut items = Vec::new();
                for (i, stock) in stocks.iter().take(n).enumerate() {
                    items.push(seed(&fx, &format!("item-{i}"), 10, *stock));
                }
                let lines: Vec<PlacementLine> = items
                    .iter()
                    .zip(quantities.iter().take(n))
                    .map(|(id, q)| line(*id, *q))
                    .collect();

                let outcome = fx.coordinator.place_order(
                    CustomerId::new(),
                    &lines,
                    PaymentMethod::Online,
                );

                for ((id, stock), q) in items.iter().zip(stocks.iter()).zip(quantities.iter()) {
                    let now = fx.catalog.current_stock(*id).unwrap();
                    if outcome.is_ok() {
                        prop_assert_eq!(now, stock - q);
                    } else {
                        prop_assert_eq!(now, *stock);
                    }
                }
                prop_assert_eq!(fx.ledger.list_all().len(), usize::from(outcome.is_ok()));
            }
        }
    }
}
