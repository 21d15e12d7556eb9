use axum::{Router, routing::get};

pub mod admin;
pub mod menu;
pub mod orders;
pub mod system;

/// Router for everything reachable without a bearer token: the menu board
/// and the pickup-token status screen.
pub fn public_router() -> Router {
    Router::new()
        .route("/menu", get(menu::list_menu))
        .route("/menu/categories", get(menu::list_categories))
        .route("/track/:token", get(orders::get_by_token))
}

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/orders", orders::router())
        .nest("/admin", admin::router())
}
