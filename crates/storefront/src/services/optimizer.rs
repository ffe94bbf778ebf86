//! Cheapest-offer suggestions for the shopping list.

use ecofeira_core::text::normalize;
use ecofeira_core::{Price, Product, ShoppingListItem};

/// Suggests where to buy each shopping list line.
pub trait ListOptimizer {
    fn optimize(&self, items: &[ShoppingListItem], products: &[Product]) -> OptimizedList;
}

/// The best known offer for one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizedEntry {
    pub item: ShoppingListItem,
    /// Cheapest same-named offer, if the catalog still has one.
    pub best_offer: Option<Product>,
    /// Best unit price; the snapshot price when nothing cheaper is known.
    pub unit_price: Price,
}

impl OptimizedEntry {
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.unit_price.times(self.item.quantity)
    }
}

/// Result of optimizing a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizedList {
    pub entries: Vec<OptimizedEntry>,
    /// Sum of snapshot subtotals.
    pub original_total: Price,
    /// Sum of best-offer subtotals.
    pub optimized_total: Price,
    /// Never negative.
    pub saving: Price,
}

/// Picks the cheapest offer with the same normalized name for every line.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheapestOfferOptimizer;

impl ListOptimizer for CheapestOfferOptimizer {
    fn optimize(&self, items: &[ShoppingListItem], products: &[Product]) -> OptimizedList {
        let entries: Vec<OptimizedEntry> = items
            .iter()
            .map(|item| {
                let name = normalize(&item.product_name);
                let best_offer = products
                    .iter()
                    .filter(|p| normalize(&p.name) == name)
                    .min_by_key(|p| p.effective_price())
                    .cloned();
                let unit_price = best_offer
                    .as_ref()
                    .map_or(item.original_price, |p| {
                        p.effective_price().min(item.original_price)
                    });

                OptimizedEntry {
                    item: item.clone(),
                    best_offer,
                    unit_price,
                }
            })
            .collect();

        let original_total: Price = items.iter().map(ShoppingListItem::subtotal).sum();
        let optimized_total: Price = entries.iter().map(OptimizedEntry::subtotal).sum();

        OptimizedList {
            saving: original_total - optimized_total,
            entries,
            original_total,
            optimized_total,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::ShoppingList;
    use crate::test_support::{product, promo};

    #[test]
    fn test_finds_cheaper_store_and_saving() {
        let catalog = vec![
            product("A1", "Arroz 5kg", "Grãos", "Super A", 3000),
            promo("B1", "ARROZ 5KG", "Grãos", "Super B", 2800, 2500),
            product("A2", "Leite", "Laticínios", "Super A", 500),
        ];
        let mut list = ShoppingList::default();
        let arroz = list.add(catalog.first().unwrap());
        list.update_quantity(&arroz, 1);
        list.add(catalog.last().unwrap());

        let result = CheapestOfferOptimizer.optimize(list.items(), &catalog);

        let first = result.entries.first().unwrap();
        assert_eq!(first.best_offer.as_ref().unwrap().id.as_str(), "B1");
        assert_eq!(result.original_total, Price::from_cents(6500));
        assert_eq!(result.optimized_total, Price::from_cents(5500));
        assert_eq!(result.saving, Price::from_cents(1000));
    }

    #[test]
    fn test_missing_or_pricier_offers_keep_snapshot() {
        let mut list = ShoppingList::default();
        list.add(&product("A1", "Café", "Mercearia", "Super A", 1500));
        list.add(&product("A2", "Sal", "Mercearia", "Super A", 300));

        // Café got more expensive, Sal disappeared from the catalog.
        let catalog = vec![product("A1", "Café", "Mercearia", "Super A", 1700)];
        let result = CheapestOfferOptimizer.optimize(list.items(), &catalog);

        assert!(result.entries.last().unwrap().best_offer.is_none());
        assert_eq!(result.optimized_total, result.original_total);
        assert!(result.saving.is_zero());
    }
}
