//! Shopping list entries.

use serde::{Deserialize, Serialize};

use super::{ListItemId, Price};

/// One line of the shopping list.
///
/// Entries are keyed by product *name*, not product id: adding the same item
/// from another store bumps the quantity of the existing line and keeps the
/// first store's price snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingListItem {
    pub id: ListItemId,
    pub product_name: String,
    /// Always at least 1.
    pub quantity: u32,
    #[serde(default)]
    pub checked: bool,
    /// Effective price when the line was created.
    pub original_price: Price,
    /// Store the line was created from.
    pub original_store: String,
}

impl ShoppingListItem {
    /// Snapshot price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.original_price.times(self.quantity)
    }
}
