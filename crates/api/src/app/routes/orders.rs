use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};

use canteen_core::{ItemId, OrderId};
use canteen_orders::{PlacementLine, Requester};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(place_order))
        .route("/history", get(order_history))
        .route("/:id/cancel", put(cancel_order))
}

pub async fn place_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<crate::context::PrincipalContext>,
    Json(body): Json<dto::PlaceOrderRequest>,
) -> axum::response::Response {
    let mut lines = Vec::with_capacity(body.lines.len());
    for line in &body.lines {
        let item_id: ItemId = match line.item_id.parse() {
            Ok(v) => v,
            Err(_) => {
                return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid item id");
            }
        };
        lines.push(PlacementLine {
            item_id,
            quantity: line.quantity,
            expected_unit_price: line.unit_price,
        });
    }

    let receipt = match services.coordinator.place_order(
        principal.customer_id(),
        &lines,
        body.payment_method.unwrap_or_default(),
    ) {
        Ok(r) => r,
        Err(e) => return errors::engine_error_to_response(e),
    };

    (StatusCode::CREATED, Json(dto::receipt_to_json(receipt))).into_response()
}

pub async fn order_history(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<crate::context::PrincipalContext>,
) -> axum::response::Response {
    let orders = services.ledger.history_for(principal.customer_id());
    (
        StatusCode::OK,
        Json(orders.into_iter().map(dto::order_to_json).collect::<Vec<_>>()),
    )
        .into_response()
}

pub async fn cancel_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<crate::context::PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let order_id: OrderId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid order id");
        }
    };

    let requester = if principal.is_admin() {
        Requester::Admin
    } else {
        Requester::Customer(principal.customer_id())
    };

    match services.coordinator.cancel_order(order_id, requester) {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "status": "cancelled" })),
        )
            .into_response(),
        Err(e) => errors::engine_error_to_response(e),
    }
}

/// Pickup-token lookup for the counter screen. No auth: tokens are spoken
/// aloud anyway and the payload holds no payment detail beyond the id.
pub async fn get_by_token(
    Extension(services): Extension<Arc<AppServices>>,
    Path(token): Path<String>,
) -> axum::response::Response {
    match services.ledger.find_by_token(&token) {
        Some(order) => (StatusCode::OK, Json(dto::order_to_json(order))).into_response(),
        None => errors::json_error(StatusCode::NOT_FOUND, "not_found", "order not found"),
    }
}
