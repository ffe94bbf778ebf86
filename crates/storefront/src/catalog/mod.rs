//! Read-only catalog: products, supermarkets, banners and popular searches.
//!
//! # Architecture
//!
//! - The catalog lives in a spreadsheet exposed as JSON, one tab per collection
//! - Fetched once at startup; every tab is requested concurrently
//! - A failed tab degrades to an empty collection and is logged, never fatal
//! - In-memory caching via `moka` for tab responses (5 minute TTL)
//!
//! # Example
//!
//! ```rust,ignore
//! use ecofeira_storefront::catalog::CatalogClient;
//!
//! let client = CatalogClient::new(&config.catalog);
//! let catalog = client.load().await;
//! println!("{} products in {} stores", catalog.products.len(), catalog.stores.len());
//! ```

mod cache;
mod client;
mod conversions;

pub use client::CatalogClient;
pub use conversions::{convert_banners, convert_products, convert_stores, convert_suggestions};

use std::collections::HashSet;

use ecofeira_core::{Banner, Product, ProductId, Store, StoreId};
use thiserror::Error;

/// Errors that can occur when fetching a catalog tab.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The source answered with a non-success status.
    #[error("{sheet} returned HTTP {status}")]
    Status {
        sheet: Sheet,
        status: reqwest::StatusCode,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The body was valid JSON but not a list of rows.
    #[error("{0} did not return a list of rows")]
    UnexpectedShape(Sheet),
}

/// A spreadsheet tab served by the catalog source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sheet {
    Products,
    Supermarkets,
    MainBanners,
    GridBanners,
    Suggestions,
}

impl Sheet {
    /// Tab name used in the `sheet` query parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Supermarkets => "supermarkets",
            Self::MainBanners => "main_banners",
            Self::GridBanners => "grid_banners",
            Self::Suggestions => "suggestions",
        }
    }
}

impl std::fmt::Display for Sheet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label used in category pickers for "no category filter".
pub const ALL_CATEGORIES: &str = "Todas";

/// Label used in store pickers for "no store filter".
pub const ALL_STORES: &str = "Todos";

/// Everything fetched from the catalog source at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub products: Vec<Product>,
    pub stores: Vec<Store>,
    pub main_banners: Vec<Banner>,
    pub grid_banners: Vec<Banner>,
    pub popular_suggestions: Vec<String>,
}

/// Counters shown in the home page hero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogStats {
    pub products: usize,
    pub stores: usize,
    pub promotions: usize,
}

impl Catalog {
    /// Whether nothing at all was loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty() && self.stores.is_empty()
    }

    /// Look up a product by id.
    #[must_use]
    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Look up a store by id.
    #[must_use]
    pub fn store(&self, id: &StoreId) -> Option<&Store> {
        self.stores.iter().find(|s| &s.id == id)
    }

    /// Look up a store by its display name.
    #[must_use]
    pub fn store_named(&self, name: &str) -> Option<&Store> {
        self.stores.iter().find(|s| s.name == name)
    }

    /// Logo for the store a list entry was created from.
    #[must_use]
    pub fn store_logo(&self, store_name: &str) -> Option<&str> {
        self.store_named(store_name)
            .map(|s| s.logo.as_str())
            .filter(|logo| !logo.is_empty())
    }

    /// Category picker entries: `"Todas"` then distinct categories in catalog order.
    #[must_use]
    pub fn category_options(&self) -> Vec<&str> {
        std::iter::once(ALL_CATEGORIES)
            .chain(distinct(self.products.iter().map(|p| p.category.as_str())))
            .collect()
    }

    /// Store picker entries: `"Todos"` then distinct store names in catalog order.
    #[must_use]
    pub fn store_options(&self) -> Vec<&str> {
        std::iter::once(ALL_STORES)
            .chain(distinct(self.products.iter().map(|p| p.supermarket.as_str())))
            .collect()
    }

    /// Home page counters.
    #[must_use]
    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            products: self.products.len(),
            stores: self.stores.len(),
            promotions: self.products.iter().filter(|p| p.is_promo).count(),
        }
    }
}

/// Distinct values, first occurrence wins.
fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    values.filter(|v| seen.insert(*v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{product, promo};

    fn catalog() -> Catalog {
        Catalog {
            products: vec![
                product("1", "Arroz 5kg", "Grãos", "Super A", 3000),
                promo("2", "Feijão 1kg", "Grãos", "Super B", 900, 750),
                product("3", "Leite", "Laticínios", "Super A", 500),
            ],
            ..Catalog::default()
        }
    }

    #[test]
    fn test_category_options_start_with_sentinel() {
        assert_eq!(
            catalog().category_options(),
            vec!["Todas", "Grãos", "Laticínios"]
        );
    }

    #[test]
    fn test_store_options_are_distinct() {
        assert_eq!(catalog().store_options(), vec!["Todos", "Super A", "Super B"]);
    }

    #[test]
    fn test_stats_count_promotions() {
        let stats = catalog().stats();
        assert_eq!(stats.products, 3);
        assert_eq!(stats.stores, 0);
        assert_eq!(stats.promotions, 1);
    }

    #[test]
    fn test_product_lookup() {
        let catalog = catalog();
        assert_eq!(
            catalog.product(&ProductId::new("2")).map(|p| p.name.as_str()),
            Some("Feijão 1kg")
        );
        assert!(catalog.product(&ProductId::new("404")).is_none());
    }
}
