//! "Compare prices" on the product page.
//!
//! Offers are matched by normalized name only: `"Arroz 5kg"` at two stores is
//! the same product, `"Arroz 5 kg"` is not.

use ecofeira_core::text::normalize;
use ecofeira_core::{Price, Product};

/// Most alternatives shown next to a product.
pub const MAX_COMPARISONS: usize = 4;

/// An alternative offer for the product being viewed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub product: Product,
    pub price: Price,
    /// Badge on the cheapest alternative when it does not cost more than the
    /// product being viewed. Display only.
    pub best_price: bool,
}

/// Same-named offers from the rest of the catalog, cheapest first, at most four.
#[must_use]
pub fn compare(target: &Product, catalog: &[Product]) -> Vec<Comparison> {
    let base_name = normalize(&target.name);

    let mut candidates: Vec<&Product> = catalog
        .iter()
        .filter(|p| p.id != target.id && normalize(&p.name) == base_name)
        .collect();
    candidates.sort_by_key(|p| p.effective_price());
    candidates.truncate(MAX_COMPARISONS);

    let target_price = target.effective_price();
    candidates
        .into_iter()
        .enumerate()
        .map(|(index, p)| Comparison {
            price: p.effective_price(),
            best_price: index == 0 && p.effective_price() <= target_price,
            product: p.clone(),
        })
        .collect()
}
