//! Public menu board: anyone can browse items and categories.

use std::sync::Arc;

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

use crate::app::{dto, services::AppServices};

pub async fn list_menu(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let items = services.catalog.list();
    (
        StatusCode::OK,
        Json(
            items
                .into_iter()
                .map(dto::menu_item_to_json)
                .collect::<Vec<_>>(),
        ),
    )
        .into_response()
}

pub async fn list_categories(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let categories = services.catalog.list_categories();
    (
        StatusCode::OK,
        Json(
            categories
                .into_iter()
                .map(dto::category_to_json)
                .collect::<Vec<_>>(),
        ),
    )
        .into_response()
}
