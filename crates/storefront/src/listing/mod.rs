//! Product and store listing pipeline.
//!
//! Every view re-runs the whole chain on each input change:
//! normalize → substring match → category/store filter → promo filter →
//! stable sort → page slice. There is no ranking and no fuzzy matching beyond
//! accent- and case-insensitive containment.

mod pagination;
mod suggestions;

pub use pagination::{PAGE_SIZE, Page, paginate, total_pages};
pub use suggestions::{
    MAX_SEARCH_SUGGESTIONS, MAX_STORE_SUGGESTIONS, SuggestionKind, SearchSuggestion,
    search_suggestions, store_product_suggestions, store_suggestions,
};

use ecofeira_core::text::{contains_normalized, normalize};
use ecofeira_core::{Product, ProductId, Store};

use crate::catalog::{ALL_CATEGORIES, ALL_STORES};

/// Listing sort order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListingSort {
    /// Catalog order.
    #[default]
    None,
    /// Cheapest effective price first.
    PriceAsc,
    /// Biggest relative discount first; non-promo rows count as 0%.
    DiscountDesc,
}

impl ListingSort {
    /// Parse from a picker value. Unknown values mean catalog order.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "price-asc" | "price" => Self::PriceAsc,
            // Older pickers send "price-desc" for the discount sort.
            "discount-desc" | "discount" | "price-desc" => Self::DiscountDesc,
            _ => Self::None,
        }
    }

    /// Convert to a picker value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::PriceAsc => "price-asc",
            Self::DiscountDesc => "discount-desc",
        }
    }
}

/// Filters for the product listing.
///
/// `category` and `store` are `None` for "all"; [`ListingFilters::category_from_label`]
/// maps the `"Todas"`/`"Todos"` picker sentinels onto that.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct ListingFilters {
    /// Raw search text as typed or scanned.
    pub query: String,
    /// Exact category name.
    pub category: Option<String>,
    /// Exact store name.
    pub store: Option<String>,
    /// Keep promo rows only.
    pub only_promo: bool,
    pub sort: ListingSort,
}

impl ListingFilters {
    /// Map a category picker label to a filter value.
    #[must_use]
    pub fn category_from_label(label: &str) -> Option<String> {
        (label != ALL_CATEGORIES && !label.is_empty()).then(|| label.to_owned())
    }

    /// Map a store picker label to a filter value.
    #[must_use]
    pub fn store_from_label(label: &str) -> Option<String> {
        (label != ALL_STORES && !label.is_empty()).then(|| label.to_owned())
    }
}

/// Run the listing pipeline over the catalog.
///
/// The query matches normalized name, category or store name, or the raw id
/// exactly (scanned codes are often product ids).
#[must_use]
pub fn filter_products(products: &[Product], filters: &ListingFilters) -> Vec<Product> {
    let query = normalize(&filters.query);

    let mut result: Vec<Product> = products
        .iter()
        .filter(|p| {
            filters.query.is_empty()
                || contains_normalized(&p.name, &query)
                || contains_normalized(&p.category, &query)
                || contains_normalized(&p.supermarket, &query)
                || p.id.as_str() == filters.query
        })
        .filter(|p| filters.category.as_ref().is_none_or(|c| &p.category == c))
        .filter(|p| filters.store.as_ref().is_none_or(|s| &p.supermarket == s))
        .filter(|p| !filters.only_promo || p.is_promo)
        .cloned()
        .collect();

    sort_products(&mut result, filters.sort);
    result
}

/// Listing for a single store's page.
///
/// Restricted to the store's offers; the query matches product names only and
/// there is no promo toggle.
#[must_use]
pub fn store_products(
    products: &[Product],
    store: &Store,
    query: &str,
    category: Option<&str>,
    sort: ListingSort,
) -> Vec<Product> {
    let normalized = normalize(query);

    let mut result: Vec<Product> = products
        .iter()
        .filter(|p| p.supermarket == store.name)
        .filter(|p| query.is_empty() || contains_normalized(&p.name, &normalized))
        .filter(|p| category.is_none_or(|c| p.category == c))
        .cloned()
        .collect();

    sort_products(&mut result, sort);
    result
}

/// Favorited products in catalog order.
#[must_use]
pub fn favorite_products(products: &[Product], favorites: &[ProductId]) -> Vec<Product> {
    products
        .iter()
        .filter(|p| favorites.contains(&p.id))
        .cloned()
        .collect()
}

/// Stores whose name, neighborhood or street contains the query.
#[must_use]
pub fn filter_stores(stores: &[Store], query: &str) -> Vec<Store> {
    let normalized = normalize(query);
    stores
        .iter()
        .filter(|s| {
            query.is_empty()
                || contains_normalized(&s.name, &normalized)
                || contains_normalized(&s.neighborhood, &normalized)
                || contains_normalized(&s.street, &normalized)
        })
        .cloned()
        .collect()
}

/// Stable in-place sort.
pub fn sort_products(products: &mut [Product], sort: ListingSort) {
    match sort {
        ListingSort::None => {}
        ListingSort::PriceAsc => products.sort_by_key(Product::effective_price),
        ListingSort::DiscountDesc => {
            products.sort_by(|a, b| b.discount_ratio().cmp(&a.discount_ratio()));
        }
    }
}
