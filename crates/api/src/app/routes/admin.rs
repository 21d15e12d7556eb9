//! Counter-staff surface: menu management and whole-ledger order control.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};

use canteen_catalog::{MenuItemDraft, MenuItemPatch};
use canteen_core::ItemId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz;

pub fn router() -> Router {
    Router::new()
        .route("/menu", post(create_menu_item))
        .route("/menu/:id", put(update_menu_item))
        .route("/menu/:id", delete(delete_menu_item))
        .route("/menu/:id/adjust", post(adjust_stock))
        .route("/orders", get(list_orders))
        .route("/orders/:token/status", put(set_order_status))
        .route("/orders/:token", delete(delete_order))
        .route("/stats", get(stats))
}

pub async fn create_menu_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<crate::context::PrincipalContext>,
    Json(body): Json<dto::CreateMenuItemRequest>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_admin(&principal) {
        return resp;
    }

    let draft = MenuItemDraft {
        name: body.name,
        price: body.price,
        stock: body.stock,
        category: body.category,
        image: body.image,
    };

    match services.catalog.add_item(draft) {
        Ok(item) => (StatusCode::CREATED, Json(dto::menu_item_to_json(item))).into_response(),
        Err(e) => errors::engine_error_to_response(e),
    }
}

pub async fn update_menu_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<crate::context::PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateMenuItemRequest>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_admin(&principal) {
        return resp;
    }

    let item_id: ItemId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid item id");
        }
    };

    let patch = MenuItemPatch {
        name: body.name,
        price: body.price,
        stock: body.stock,
        category: body.category,
        image: body.image,
    };

    match services.catalog.update_item(item_id, patch) {
        Ok(item) => (StatusCode::OK, Json(dto::menu_item_to_json(item))).into_response(),
        Err(e) => errors::engine_error_to_response(e),
    }
}

pub async fn delete_menu_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<crate::context::PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_admin(&principal) {
        return resp;
    }

    let item_id: ItemId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid item id");
        }
    };

    match services.catalog.remove_item(item_id) {
        Ok(item) => (StatusCode::OK, Json(dto::menu_item_to_json(item))).into_response(),
        Err(e) => errors::engine_error_to_response(e),
    }
}

pub async fn adjust_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<crate::context::PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::AdjustStockRequest>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_admin(&principal) {
        return resp;
    }

    let item_id: ItemId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid item id");
        }
    };

    match services.catalog.adjust_stock(item_id, body.delta) {
        Ok(stock) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "id": item_id.to_string(),
                "stock": stock,
            })),
        )
            .into_response(),
        Err(e) => errors::engine_error_to_response(e),
    }
}

pub async fn list_orders(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<crate::context::PrincipalContext>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_admin(&principal) {
        return resp;
    }

    let orders = services.ledger.list_all();
    (
        StatusCode::OK,
        Json(orders.into_iter().map(dto::order_to_json).collect::<Vec<_>>()),
    )
        .into_response()
}

pub async fn set_order_status(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<crate::context::PrincipalContext>,
    Path(token): Path<String>,
    Json(body): Json<dto::SetStatusRequest>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_admin(&principal) {
        return resp;
    }

    let status = match errors::parse_order_status(&body.status) {
        Ok(s) => s,
        Err(resp) => return resp,
    };

    match services.coordinator.set_status(&token, status) {
        Ok(order) => (StatusCode::OK, Json(dto::order_to_json(order))).into_response(),
        Err(e) => errors::engine_error_to_response(e),
    }
}

pub async fn delete_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<crate::context::PrincipalContext>,
    Path(token): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_admin(&principal) {
        return resp;
    }

    match services.coordinator.delete_order(&token) {
        Ok(order) => (StatusCode::OK, Json(dto::order_to_json(order))).into_response(),
        Err(e) => errors::engine_error_to_response(e),
    }
}

pub async fn stats(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<crate::context::PrincipalContext>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_admin(&principal) {
        return resp;
    }

    (StatusCode::OK, Json(services.ledger.stats())).into_response()
}
