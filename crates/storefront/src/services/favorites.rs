//! Favorited products.

use ecofeira_core::ProductId;

/// Ordered set of favorited product ids, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Favorites {
    ids: Vec<ProductId>,
}

impl Favorites {
    /// Restore from persisted ids, dropping duplicates.
    #[must_use]
    pub fn from_ids(ids: Vec<ProductId>) -> Self {
        let mut favorites = Self::default();
        for id in ids {
            if !favorites.contains(&id) {
                favorites.ids.push(id);
            }
        }
        favorites
    }

    /// Add the id if absent, remove it otherwise. Returns whether it is now a favorite.
    pub fn toggle(&mut self, id: &ProductId) -> bool {
        if let Some(pos) = self.ids.iter().position(|f| f == id) {
            self.ids.remove(pos);
            false
        } else {
            self.ids.push(id.clone());
            true
        }
    }

    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.ids.contains(id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    #[must_use]
    pub fn ids(&self) -> &[ProductId] {
        &self.ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut favorites = Favorites::default();
        let id = ProductId::new("A1");

        assert!(favorites.toggle(&id));
        assert!(favorites.contains(&id));
        assert!(!favorites.toggle(&id));
        assert!(favorites.is_empty());
    }

    #[test]
    fn test_from_ids_keeps_first_occurrence() {
        let favorites = Favorites::from_ids(vec![
            ProductId::new("B"),
            ProductId::new("A"),
            ProductId::new("B"),
        ]);
        assert_eq!(favorites.ids(), &[ProductId::new("B"), ProductId::new("A")]);
    }
}
