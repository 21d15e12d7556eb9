//! Engine wiring shared by every handler.

use std::sync::Arc;

use canteen_catalog::CatalogStore;
use canteen_orders::{OrderLedger, ReservationCoordinator};

pub struct AppServices {
    pub catalog: Arc<CatalogStore>,
    pub ledger: Arc<OrderLedger>,
    pub coordinator: ReservationCoordinator,
}

pub fn build_services() -> AppServices {
    let catalog = Arc::new(CatalogStore::new());
    let ledger = Arc::new(OrderLedger::new());
    let coordinator = ReservationCoordinator::new(catalog.clone(), ledger.clone());

    AppServices {
        catalog,
        ledger,
        coordinator,
    }
}
