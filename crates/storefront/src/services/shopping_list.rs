//! The shopping list.
//!
//! Lines are grouped by product name. Adding "Arroz 5kg" from a second store
//! bumps the existing line, which keeps the first store's price and name.

use ecofeira_core::{ListItemId, Price, Product, ShoppingListItem};

/// Ordered shopping list lines, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShoppingList {
    items: Vec<ShoppingListItem>,
}

impl ShoppingList {
    /// Restore persisted lines. Zero quantities are raised to 1.
    #[must_use]
    pub fn from_items(mut items: Vec<ShoppingListItem>) -> Self {
        for item in &mut items {
            item.quantity = item.quantity.max(1);
        }
        Self { items }
    }

    /// Add one unit of a product and return the affected line's id.
    pub fn add(&mut self, product: &Product) -> ListItemId {
        if let Some(item) = self
            .items
            .iter_mut()
            .find(|i| i.product_name == product.name)
        {
            item.quantity = item.quantity.saturating_add(1);
            return item.id.clone();
        }

        let item = ShoppingListItem {
            id: ListItemId::generate(),
            product_name: product.name.clone(),
            quantity: 1,
            checked: false,
            original_price: product.effective_price(),
            original_store: product.supermarket.clone(),
        };
        let id = item.id.clone();
        self.items.push(item);
        id
    }

    /// Change a line's quantity by `delta`, never below 1.
    /// Returns `false` if the id is unknown.
    pub fn update_quantity(&mut self, id: &ListItemId, delta: i32) -> bool {
        let Some(item) = self.items.iter_mut().find(|i| &i.id == id) else {
            return false;
        };

        let magnitude = delta.unsigned_abs();
        item.quantity = if delta >= 0 {
            item.quantity.saturating_add(magnitude)
        } else {
            item.quantity.saturating_sub(magnitude).max(1)
        };
        true
    }

    /// Delete a line. Returns `false` if the id is unknown.
    pub fn remove(&mut self, id: &ListItemId) -> bool {
        let before = self.items.len();
        self.items.retain(|i| &i.id != id);
        self.items.len() != before
    }

    /// Flip a line's checked flag. Returns the new value, or `None` if unknown.
    pub fn toggle_checked(&mut self, id: &ListItemId) -> Option<bool> {
        let item = self.items.iter_mut().find(|i| &i.id == id)?;
        item.checked = !item.checked;
        Some(item.checked)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[must_use]
    pub fn get(&self, id: &ListItemId) -> Option<&ShoppingListItem> {
        self.items.iter().find(|i| &i.id == id)
    }

    #[must_use]
    pub fn items(&self) -> &[ShoppingListItem] {
        &self.items
    }

    /// Sum of snapshot price times quantity.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(ShoppingListItem::subtotal).sum()
    }

    /// Number of checked lines.
    #[must_use]
    pub fn checked_count(&self) -> usize {
        self.items.iter().filter(|i| i.checked).count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
