use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, RwLock};

use chrono::Utc;

use canteen_core::{EngineError, EngineResult, ItemId};

use crate::item::{CategoryCount, MenuItem, MenuItemDraft, MenuItemPatch};

/// A committed stock decrement, with the price/name snapshot captured at the
/// moment of the decrement. Order lines are built from this snapshot, not
/// from caller-supplied data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub item_id: ItemId,
    pub name: String,
    pub unit_price: u64,
    pub quantity: u32,
}

/// Outcome of a stock release.
///
/// Releasing against a since-deleted item cannot restore anything; it is a
/// warned no-op so the owning order stays cancellable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Released {
    Restored { new_stock: u32 },
    ItemGone,
}

/// The authoritative store of menu items and their stock counters.
///
/// Locking discipline: the outer `RwLock` only guards the *set* of items
/// (insert/remove take the write lock); each counter sits behind its own
/// `Mutex`, so reserve/release on the same item are linearizable while
/// distinct items never contend.
#[derive(Debug, Default)]
pub struct CatalogStore {
    items: RwLock<HashMap<ItemId, Mutex<MenuItem>>>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
        }
    }

    /// Add a new item to the catalog and return it (id assigned here).
    pub fn add_item(&self, draft: MenuItemDraft) -> EngineResult<MenuItem> {
        draft.validate()?;

        let now = Utc::now();
        let item = MenuItem {
            id: ItemId::new(),
            name: draft.name,
            price: draft.price,
            stock: draft.stock,
            category: draft.category,
            image: draft.image,
            created_at: now,
            updated_at: now,
        };

        let mut map = self.items.write().map_err(|_| lock_poisoned())?;
        map.insert(item.id, Mutex::new(item.clone()));
        Ok(item)
    }

    /// Apply a partial update; untouched fields keep their values.
    pub fn update_item(&self, item_id: ItemId, patch: MenuItemPatch) -> EngineResult<MenuItem> {
        let map = self.items.read().map_err(|_| lock_poisoned())?;
        let slot = map
            .get(&item_id)
            .ok_or(EngineError::ItemNotFound { item_id })?;

        // Validate before touching anything so a bad patch applies nothing.
        if matches!(&patch.name, Some(name) if name.trim().is_empty()) {
            return Err(EngineError::validation("name cannot be empty"));
        }
        if matches!(&patch.category, Some(category) if category.trim().is_empty()) {
            return Err(EngineError::validation("category cannot be empty"));
        }

        let mut item = slot.lock().map_err(|_| lock_poisoned())?;
        if let Some(name) = patch.name {
            item.name = name;
        }
        if let Some(price) = patch.price {
            item.price = price;
        }
        if let Some(stock) = patch.stock {
            item.stock = stock;
        }
        if let Some(category) = patch.category {
            item.category = category;
        }
        if let Some(image) = patch.image {
            item.image = Some(image);
        }
        item.updated_at = Utc::now();
        Ok(item.clone())
    }

    /// Remove an item from the catalog, returning its last state.
    ///
    /// Orders already holding reservations against it stay valid; their
    /// releases will land as [`Released::ItemGone`].
    pub fn remove_item(&self, item_id: ItemId) -> EngineResult<MenuItem> {
        let mut map = self.items.write().map_err(|_| lock_poisoned())?;
        let slot = map
            .remove(&item_id)
            .ok_or(EngineError::ItemNotFound { item_id })?;
        let item = slot.into_inner().map_err(|_| lock_poisoned())?;
        Ok(item)
    }

    pub fn get(&self, item_id: ItemId) -> Option<MenuItem> {
        let map = self.items.read().ok()?;
        let slot = map.get(&item_id)?;
        slot.lock().ok().map(|item| item.clone())
    }

    /// All items, sorted by name for stable listings.
    pub fn list(&self) -> Vec<MenuItem> {
        let map = match self.items.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };
        let mut items: Vec<MenuItem> = map
            .values()
            .filter_map(|slot| slot.lock().ok().map(|item| item.clone()))
            .collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        items
    }

    /// Distinct categories with their item counts, sorted by name.
    pub fn list_categories(&self) -> Vec<CategoryCount> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for item in self.list() {
            *counts.entry(item.category).or_insert(0) += 1;
        }
        counts
            .into_iter()
            .map(|(name, count)| CategoryCount { name, count })
            .collect()
    }

    pub fn current_unit_price(&self, item_id: ItemId) -> EngineResult<u64> {
        self.get(item_id)
            .map(|item| item.price)
            .ok_or(EngineError::ItemNotFound { item_id })
    }

    pub fn current_stock(&self, item_id: ItemId) -> EngineResult<u32> {
        self.get(item_id)
            .map(|item| item.stock)
            .ok_or(EngineError::ItemNotFound { item_id })
    }

    /// Management-side stock correction (goods-in, spoilage).
    ///
    /// Goes through the same per-item lock as reserve/release and refuses to
    /// drive the counter below zero.
    pub fn adjust_stock(&self, item_id: ItemId, delta: i64) -> EngineResult<u32> {
        let map = self.items.read().map_err(|_| lock_poisoned())?;
        let slot = map
            .get(&item_id)
            .ok_or(EngineError::ItemNotFound { item_id })?;

        let mut item = slot.lock().map_err(|_| lock_poisoned())?;
        let new_stock = i64::from(item.stock) + delta;
        if new_stock < 0 {
            return Err(EngineError::insufficient_stock(
                item_id,
                delta.unsigned_abs().min(u64::from(u32::MAX)) as u32,
                item.stock,
            ));
        }
        if new_stock > i64::from(u32::MAX) {
            return Err(EngineError::validation("stock overflows"));
        }
        item.stock = new_stock as u32;
        item.updated_at = Utc::now();
        Ok(item.stock)
    }

    /// Atomically check `stock >= quantity` and decrement, in one indivisible
    /// step relative to every other reserve/release on the same item.
    ///
    /// Fails without side effects on insufficient stock or a missing item.
    pub fn try_reserve(&self, item_id: ItemId, quantity: u32) -> EngineResult<Reservation> {
        if quantity == 0 {
            return Err(EngineError::validation("quantity must be positive"));
        }

        let map = self.items.read().map_err(|_| lock_poisoned())?;
        let slot = map
            .get(&item_id)
            .ok_or(EngineError::ItemNotFound { item_id })?;

        let mut item = slot.lock().map_err(|_| lock_poisoned())?;
        if item.stock < quantity {
            return Err(EngineError::insufficient_stock(
                item_id, quantity, item.stock,
            ));
        }
        item.stock -= quantity;
        item.updated_at = Utc::now();

        Ok(Reservation {
            item_id,
            name: item.name.clone(),
            unit_price: item.price,
            quantity,
        })
    }

    /// Atomically return `quantity` units to the item's counter.
    ///
    /// Used for placement rollback and for cancellation/deletion. A missing
    /// item is tolerated: the stock is gone with the catalog entry, but the
    /// caller's compensation must still complete.
    pub fn release(&self, item_id: ItemId, quantity: u32) -> Released {
        let map = match self.items.read() {
            Ok(m) => m,
            Err(_) => return Released::ItemGone,
        };
        let Some(slot) = map.get(&item_id) else {
            tracing::warn!(%item_id, quantity, "release against missing catalog item; stock not restored");
            return Released::ItemGone;
        };

        match slot.lock() {
            Ok(mut item) => {
                item.stock = item.stock.saturating_add(quantity);
                item.updated_at = Utc::now();
                Released::Restored {
                    new_stock: item.stock,
                }
            }
            Err(_) => Released::ItemGone,
        }
    }
}

fn lock_poisoned() -> EngineError {
    EngineError::validation("catalog lock poisoned")
}
