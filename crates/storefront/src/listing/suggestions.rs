//! Type-ahead suggestions for the search boxes.

use std::collections::HashSet;

use ecofeira_core::text::{contains_normalized, normalize};
use ecofeira_core::{Product, Store};

/// Maximum suggestions under a product search box.
pub const MAX_SEARCH_SUGGESTIONS: usize = 8;

/// Maximum suggestions under the store search box.
pub const MAX_STORE_SUGGESTIONS: usize = 5;

/// Suggestions start once this many characters are typed.
const MIN_QUERY_CHARS: usize = 2;

/// What a suggestion points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionKind {
    Category,
    Product,
}

/// A type-ahead entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSuggestion {
    pub label: String,
    pub kind: SuggestionKind,
}

fn long_enough(query: &str) -> bool {
    query.chars().count() >= MIN_QUERY_CHARS
}

/// Listing suggestions: matching categories first, then product names.
#[must_use]
pub fn search_suggestions(products: &[Product], query: &str) -> Vec<SearchSuggestion> {
    if !long_enough(query) {
        return Vec::new();
    }
    let normalized = normalize(query);

    let mut seen = HashSet::new();
    let categories = products
        .iter()
        .map(|p| p.category.as_str())
        .filter(|c| seen.insert(*c))
        .filter(|c| contains_normalized(c, &normalized))
        .map(|c| SearchSuggestion {
            label: c.to_owned(),
            kind: SuggestionKind::Category,
        });

    let names = products
        .iter()
        .filter(|p| contains_normalized(&p.name, &normalized))
        .map(|p| SearchSuggestion {
            label: p.name.clone(),
            kind: SuggestionKind::Product,
        });

    categories.chain(names).take(MAX_SEARCH_SUGGESTIONS).collect()
}

/// Product-name suggestions scoped to one store's page.
#[must_use]
pub fn store_product_suggestions(products: &[Product], store: &Store, query: &str) -> Vec<String> {
    if !long_enough(query) {
        return Vec::new();
    }
    let normalized = normalize(query);

    products
        .iter()
        .filter(|p| p.supermarket == store.name)
        .filter(|p| contains_normalized(&p.name, &normalized))
        .map(|p| p.name.clone())
        .take(MAX_SEARCH_SUGGESTIONS)
        .collect()
}

/// Store search suggestions by name or neighborhood.
#[must_use]
pub fn store_suggestions<'a>(stores: &'a [Store], query: &str) -> Vec<&'a Store> {
    if query.is_empty() {
        return Vec::new();
    }
    let normalized = normalize(query);

    stores
        .iter()
        .filter(|s| {
            contains_normalized(&s.name, &normalized)
                || contains_normalized(&s.neighborhood, &normalized)
        })
        .take(MAX_STORE_SUGGESTIONS)
        .collect()
}
