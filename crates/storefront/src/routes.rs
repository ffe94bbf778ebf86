//! Client-side route table.
//!
//! # Routes
//!
//! | path | view |
//! | --- | --- |
//! | `/` | home |
//! | `/produtos` | product listing |
//! | `/supermercados` | store list |
//! | `/supermercado/{storeId}` | store detail |
//! | `/{storeSlug}/{categorySlug}/{productId}/{nameSlug}` | product detail |
//! | `/perfil` | profile |
//! | `/perfil/backup` | backup partner |
//! | `/favoritos` | favorites |
//! | `/lista` | shopping list |
//!
//! Unknown paths resolve to home. Filter state is kept in memory, never in
//! the path.

use ecofeira_core::text::slugify;
use ecofeira_core::{Product, ProductId, StoreId};
use url::Url;

/// A resolved view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Route {
    #[default]
    Home,
    Listing,
    Stores,
    Store(StoreId),
    Product {
        store_slug: String,
        category_slug: String,
        id: ProductId,
        name_slug: String,
    },
    Profile,
    Backup,
    Favorites,
    ShoppingList,
}

impl Route {
    /// Resolve a path, with or without the `#` prefix used in share links.
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let path = path.trim().trim_start_matches('#');
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Self::Home,
            ["produtos"] => Self::Listing,
            ["supermercados"] => Self::Stores,
            ["supermercado", id] => Self::Store(StoreId::new(*id)),
            ["perfil"] => Self::Profile,
            ["perfil", "backup"] => Self::Backup,
            ["favoritos"] => Self::Favorites,
            ["lista"] => Self::ShoppingList,
            [store, category, id, name] => Self::Product {
                store_slug: (*store).to_owned(),
                category_slug: (*category).to_owned(),
                id: ProductId::new(*id),
                name_slug: (*name).to_owned(),
            },
            _ => Self::Home,
        }
    }

    /// Detail route for a product.
    #[must_use]
    pub fn product(product: &Product) -> Self {
        Self::Product {
            store_slug: slugify(&product.supermarket),
            category_slug: slugify(&product.category),
            id: product.id.clone(),
            name_slug: slugify(&product.name),
        }
    }

    /// Path for this route, starting with `/`.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_owned(),
            Self::Listing => "/produtos".to_owned(),
            Self::Stores => "/supermercados".to_owned(),
            Self::Store(id) => format!("/supermercado/{id}"),
            Self::Product {
                store_slug,
                category_slug,
                id,
                name_slug,
            } => format!("/{store_slug}/{category_slug}/{id}/{name_slug}"),
            Self::Profile => "/perfil".to_owned(),
            Self::Backup => "/perfil/backup".to_owned(),
            Self::Favorites => "/favoritos".to_owned(),
            Self::ShoppingList => "/lista".to_owned(),
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}

/// Shareable link: `{base}/#{path}`.
#[must_use]
pub fn share_url(base: &Url, route: &Route) -> String {
    format!("{}/#{}", base.as_str().trim_end_matches('/'), route.path())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::promo;

    #[test]
    fn test_parse_static_routes() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse("/produtos"), Route::Listing);
        assert_eq!(Route::parse("/produtos/"), Route::Listing);
        assert_eq!(Route::parse("#/lista"), Route::ShoppingList);
        assert_eq!(Route::parse("/perfil/backup"), Route::Backup);
        assert_eq!(Route::parse("/supermercado/s1"), Route::Store(StoreId::new("s1")));
    }

    #[test]
    fn test_unknown_paths_fall_back_to_home() {
        assert_eq!(Route::parse("/nada"), Route::Home);
        assert_eq!(Route::parse("/a/b/c"), Route::Home);
        assert_eq!(Route::parse("/a/b/c/d/e"), Route::Home);
    }

    #[test]
    fn test_product_route_round_trip() {
        let p = promo("B1", "Feijão Carioca 1kg", "Grãos & Cereais", "Super Bom Preço", 900, 750);
        let route = Route::product(&p);
        assert_eq!(
            route.path(),
            "/super-bom-preco/graos-cereais/B1/feijao-carioca-1kg"
        );
        assert_eq!(Route::parse(&route.path()), route);
    }

    #[test]
    fn test_share_urls() {
        let base = Url::parse("https://ecofeira.app/").unwrap();
        assert_eq!(
            share_url(&base, &Route::Store(StoreId::new("s1"))),
            "https://ecofeira.app/#/supermercado/s1"
        );

        let p = promo("A1", "Arroz 5kg", "Grãos", "Super A", 3000, 2500);
        assert_eq!(
            share_url(&base, &Route::product(&p)),
            "https://ecofeira.app/#/super-a/graos/A1/arroz-5kg"
        );
    }
}
