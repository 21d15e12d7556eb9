use serde::Deserialize;

use canteen_catalog::{CategoryCount, MenuItem};
use canteen_orders::{Order, PaymentMethod, PlacementReceipt};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateMenuItemRequest {
    pub name: String,
    /// Smallest currency unit.
    pub price: u64,
    pub stock: u32,
    pub category: String,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMenuItemRequest {
    pub name: Option<String>,
    pub price: Option<u64>,
    pub stock: Option<u32>,
    pub category: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AdjustStockRequest {
    pub delta: i64,
}

#[derive(Debug, Deserialize)]
pub struct PlaceOrderLineRequest {
    pub item_id: String,
    pub quantity: u32,
    /// Price the client last saw; display-diff only, never charged.
    pub unit_price: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    pub lines: Vec<PlaceOrderLineRequest>,
    pub payment_method: Option<PaymentMethod>,
}

#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: String,
}

// -------------------------
// Response mapping
// -------------------------

pub fn menu_item_to_json(item: MenuItem) -> serde_json::Value {
    serde_json::json!({
        "id": item.id.to_string(),
        "name": item.name,
        "price": item.price,
        "stock": item.stock,
        "category": item.category,
        "image": item.image,
        "created_at": item.created_at.to_rfc3339(),
        "updated_at": item.updated_at.to_rfc3339(),
    })
}

pub fn category_to_json(c: CategoryCount) -> serde_json::Value {
    serde_json::json!({
        "name": c.name,
        "count": c.count,
    })
}

pub fn order_to_json(order: Order) -> serde_json::Value {
    serde_json::json!({
        "id": order.id.to_string(),
        "customer_id": order.customer_id.to_string(),
        "lines": order
            .lines
            .iter()
            .map(|l| serde_json::json!({
                "item_id": l.item_id.to_string(),
                "name": l.name,
                "unit_price": l.unit_price,
                "quantity": l.quantity,
                "amount": l.amount(),
            }))
            .collect::<Vec<_>>(),
        "total_amount": order.total_amount,
        "token": order.token,
        "payment_id": order.payment_id,
        "payment_method": order.payment_method,
        "status": order.status,
        "created_at": order.created_at.to_rfc3339(),
        "updated_at": order.updated_at.to_rfc3339(),
        "collected_at": order.collected_at.map(|t| t.to_rfc3339()),
    })
}

pub fn receipt_to_json(receipt: PlacementReceipt) -> serde_json::Value {
    serde_json::json!({
        "order_id": receipt.order_id.to_string(),
        "token": receipt.token,
        "payment_id": receipt.payment_id,
        "total_amount": receipt.total_amount,
    })
}
