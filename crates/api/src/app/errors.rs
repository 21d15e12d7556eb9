use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use canteen_core::EngineError;
use canteen_orders::OrderStatus;

pub fn engine_error_to_response(err: EngineError) -> axum::response::Response {
    match err {
        EngineError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        EngineError::Unauthenticated => {
            json_error(StatusCode::UNAUTHORIZED, "unauthenticated", "unauthenticated")
        }
        EngineError::ItemNotFound { item_id } => json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("item not found: {item_id}"),
        ),
        EngineError::OrderNotFound => {
            json_error(StatusCode::NOT_FOUND, "not_found", "order not found")
        }
        EngineError::InsufficientStock {
            item_id,
            requested,
            available,
        } => json_error(
            StatusCode::CONFLICT,
            "insufficient_stock",
            format!("item {item_id}: requested {requested}, available {available}"),
        ),
        EngineError::IllegalTransition { from, to } => json_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "illegal_transition",
            format!("cannot move order from '{from}' to '{to}'"),
        ),
        EngineError::OrderNotCancellable { status } => json_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "not_cancellable",
            format!("order in status '{status}' can no longer be cancelled"),
        ),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn parse_order_status(s: &str) -> Result<OrderStatus, axum::response::Response> {
    s.parse().map_err(|_| {
        json_error(
            StatusCode::BAD_REQUEST,
            "invalid_status",
            "status must be one of: confirmed, preparing, ready, collected",
        )
    })
}
