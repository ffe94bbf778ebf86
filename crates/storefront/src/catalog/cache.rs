//! Cache types for catalog tab responses.

use std::sync::Arc;

use ecofeira_core::{Banner, Product, Store};

/// Cached, already-converted tab contents.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Products(Arc<Vec<Product>>),
    Stores(Arc<Vec<Store>>),
    Banners(Arc<Vec<Banner>>),
    Suggestions(Arc<Vec<String>>),
}
