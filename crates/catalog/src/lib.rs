//! `canteen-catalog` — the catalog store: menu items and their stock counters.
//!
//! The `stock` field of every item is exclusively owned by [`CatalogStore`];
//! reserve/release are the only ways it moves once requests start flowing.

pub mod item;
pub mod store;

pub use item::{CategoryCount, MenuItem, MenuItemDraft, MenuItemPatch};
pub use store::{CatalogStore, Released, Reservation};
