//! Integration tests for EcoFeira.
//!
//! Every test runs against a `wiremock` catalog source and a temporary data
//! directory, so no network or external services are needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p ecofeira-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `catalog_listing` - Catalog fetch, listing pipeline and comparison
//! - `persistence_flow` - Favorites, shopping list and history across restarts
//! - `scan_and_backup` - Scanner resolution and the backup partner handshake

use std::path::Path;
use std::time::Duration;

use ecofeira_storefront::catalog::{Catalog, CatalogClient, convert_products, convert_stores};
use ecofeira_storefront::config::{BackupConfig, CatalogConfig, StorefrontConfig};
use ecofeira_storefront::state::AppStore;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Origin the backup partner is expected to post from.
pub const PARTNER_ORIGIN: &str = "https://ecofeira-backup.vercel.app";

/// Product rows in the catalog source's loose format.
#[must_use]
pub fn product_rows() -> Value {
    json!([
        {"id": "A1", "name": "Arroz 5kg", "category": "Grãos", "supermarket": "Super A",
         "normalPrice": 30, "isPromo": false},
        {"id": "B1", "name": "Arroz 5kg", "category": "Grãos", "supermarket": "Super B",
         "normalPrice": "28,00", "promoPrice": "25,00", "isPromo": "sim"},
        {"id": "A2", "name": "Feijão Carioca 1kg", "category": "Grãos", "supermarket": "Super A",
         "normalPrice": 8.5},
        {"id": "7891000100103", "name": "Leite Condensado", "category": "Laticínios",
         "supermarket": "Super B", "normalPrice": 7.2, "promoPrice": 5.4, "isPromo": true},
        {"id": "C1", "name": "Café Pilão 500g", "category": "Mercearia", "supermarket": "Mercado São José",
         "normalPrice": 18.9}
    ])
}

/// Supermarket rows.
#[must_use]
pub fn store_rows() -> Value {
    json!([
        {"id": "s1", "name": "Super A", "street": "Rua da Aurora", "neighborhood": "Boa Vista",
         "city": "Recife", "status": "aberto", "logo": "https://cdn.example.com/a.png"},
        {"id": "s2", "name": "Super B", "street": "Av. Boa Viagem", "neighborhood": "Boa Viagem",
         "city": "Recife", "status": "Fechado"},
        {"id": "s3", "name": "Mercado São José", "street": "Praça Dom Vital", "neighborhood": "São José",
         "city": "Recife"}
    ])
}

/// Serve `products` and the standard store rows; banner and suggestion tabs
/// return a small fixture.
pub async fn mount_catalog(server: &MockServer, products: Value) {
    for (sheet, body) in [
        ("products", products),
        ("supermarkets", store_rows()),
        ("main_banners", json!([{"imageUrl": "https://cdn.example.com/hero.png", "title": "Ofertas"}])),
        ("grid_banners", json!([])),
        ("suggestions", json!({"data": ["arroz", "café"]})),
    ] {
        Mock::given(method("GET"))
            .and(query_param("sheet", sheet))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }
}

/// Configuration pointing at the mock source and a data directory.
#[must_use]
pub fn config_for(server: &MockServer, data_dir: &Path) -> StorefrontConfig {
    let endpoint = Url::parse(&format!("{}/exec", server.uri())).expect("valid mock URL");
    config_with_endpoint(endpoint, data_dir)
}

fn config_with_endpoint(endpoint: Url, data_dir: &Path) -> StorefrontConfig {
    StorefrontConfig {
        catalog: CatalogConfig {
            endpoint,
            api_key: None,
        },
        data_dir: data_dir.to_path_buf(),
        base_url: Url::parse("https://ecofeira.app").expect("valid base URL"),
        backup: BackupConfig {
            partner_origin: Url::parse(PARTNER_ORIGIN).expect("valid partner origin"),
            handshake_timeout: Duration::from_secs(30),
        },
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// Open the store and load the catalog, like the binary does at startup.
pub async fn start(config: &StorefrontConfig) -> AppStore {
    let mut app = AppStore::open(config).expect("Failed to open data directory");
    let catalog = CatalogClient::new(&config.catalog).load().await;
    app.finish_loading(catalog);
    app
}

/// Open the store with the fixture catalog converted in-process, for tests
/// that run on paused time and must not wait on sockets.
#[must_use]
pub fn start_offline(data_dir: &Path) -> AppStore {
    let products = product_rows();
    let stores = store_rows();
    let catalog = Catalog {
        products: convert_products(products.as_array().map_or(&[][..], Vec::as_slice)),
        stores: convert_stores(stores.as_array().map_or(&[][..], Vec::as_slice)),
        ..Catalog::default()
    };

    let endpoint = Url::parse("http://127.0.0.1:9/exec").expect("valid URL");
    let config = config_with_endpoint(endpoint, data_dir);
    let mut app = AppStore::open(&config).expect("Failed to open data directory");
    app.finish_loading(catalog);
    app
}
