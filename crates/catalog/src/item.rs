use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use canteen_core::{EngineError, EngineResult, ItemId};

/// A sellable menu item.
///
/// `stock` is mutated only by [`crate::CatalogStore`] operations; everything
/// else is plain catalog data editable by menu management.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: ItemId,
    pub name: String,
    /// Price in smallest currency unit (e.g., cents).
    pub price: u64,
    pub stock: u32,
    pub category: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a menu item (the store assigns the id and timestamps).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItemDraft {
    pub name: String,
    pub price: u64,
    #[serde(default)]
    pub stock: u32,
    pub category: String,
    #[serde(default)]
    pub image: Option<String>,
}

impl MenuItemDraft {
    pub fn validate(&self) -> EngineResult<()> {
        if self.name.trim().is_empty() {
            return Err(EngineError::validation("name cannot be empty"));
        }
        if self.category.trim().is_empty() {
            return Err(EngineError::validation("category cannot be empty"));
        }
        Ok(())
    }
}

/// Partial update for a menu item; `None` fields are left untouched.
///
/// Stock edits through this path go through the same per-item lock as
/// reserve/release, so management and orders never race on the counter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItemPatch {
    pub name: Option<String>,
    pub price: Option<u64>,
    pub stock: Option<u32>,
    pub category: Option<String>,
    pub image: Option<String>,
}

/// Category name plus how many items currently carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub name: String,
    pub count: usize,
}
