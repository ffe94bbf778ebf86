//! Favorites, shopping list and history survive a restart.

#![allow(clippy::unwrap_used)]

use std::fs;

use ecofeira_core::{ListItemId, Price, ProductId};
use ecofeira_integration_tests::{config_for, mount_catalog, product_rows, start};
use ecofeira_storefront::services::CheapestOfferOptimizer;
use tempfile::TempDir;
use wiremock::MockServer;

// ============================================================================
// Restart round trip
// ============================================================================

#[tokio::test]
async fn test_state_survives_restart() {
    let server = MockServer::start().await;
    mount_catalog(&server, product_rows()).await;
    let dir = TempDir::new().unwrap();
    let config = config_for(&server, dir.path());

    let item_id = {
        let mut app = start(&config).await;
        app.toggle_favorite(&ProductId::new("C1"));
        app.toggle_favorite(&ProductId::new("A2"));
        let id = app.add_to_list(&ProductId::new("A1")).unwrap();
        app.update_quantity(&id, 2);
        app.submit_search("café");
        app.on_scan_success("7891000100103");
        id
    };

    let app = start(&config).await;
    assert_eq!(
        app.favorites().ids(),
        &[ProductId::new("C1"), ProductId::new("A2")]
    );
    let item = app.shopping_list().get(&item_id).unwrap();
    assert_eq!(item.quantity, 3);
    assert_eq!(item.original_price, Price::from_cents(3000));
    assert_eq!(app.recent_searches(), &["7891000100103", "café"]);
    assert_eq!(app.scanned_history(), &["7891000100103"]);

    // Favorites page keeps catalog order, not insertion order.
    let favorites: Vec<String> = app
        .favorites_page()
        .items
        .into_iter()
        .map(|p| p.id.into_inner())
        .collect();
    assert_eq!(favorites, vec!["A2", "C1"]);
}

#[tokio::test]
async fn test_slots_use_documented_keys() {
    let server = MockServer::start().await;
    mount_catalog(&server, product_rows()).await;
    let dir = TempDir::new().unwrap();
    let mut app = start(&config_for(&server, dir.path())).await;

    app.toggle_favorite(&ProductId::new("A1"));
    app.add_to_list(&ProductId::new("B1")).unwrap();
    app.submit_search("arroz");
    app.on_scan_success("arroz");

    for key in [
        "ecofeira_favorites",
        "ecofeira_shopping_list",
        "ecofeira_recent_searches",
        "ecofeira_scanned_history",
    ] {
        let path = dir.path().join(format!("{key}.json"));
        let raw = fs::read_to_string(&path).unwrap();
        assert!(serde_json::from_str::<serde_json::Value>(&raw).unwrap().is_array());
    }

    let list = fs::read_to_string(dir.path().join("ecofeira_shopping_list.json")).unwrap();
    let list: serde_json::Value = serde_json::from_str(&list).unwrap();
    assert_eq!(list[0]["productName"], "Arroz 5kg");
    assert_eq!(list[0]["originalStore"], "Super B");
    assert_eq!(list[0]["originalPrice"], 25.0);
    assert_eq!(list[0]["quantity"], 1);
}

// ============================================================================
// Degraded storage
// ============================================================================

#[tokio::test]
async fn test_malformed_files_read_as_empty() {
    let server = MockServer::start().await;
    mount_catalog(&server, product_rows()).await;
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("ecofeira_favorites.json"), "{oops").unwrap();
    fs::write(dir.path().join("ecofeira_shopping_list.json"), "\"not a list\"").unwrap();
    fs::write(dir.path().join("ecofeira_recent_searches.json"), "[\"leite\"]").unwrap();

    let mut app = start(&config_for(&server, dir.path())).await;
    assert!(app.favorites().is_empty());
    assert!(app.shopping_list().is_empty());
    assert_eq!(app.recent_searches(), &["leite"]);

    // The next write replaces the bad file.
    app.toggle_favorite(&ProductId::new("A1"));
    let raw = fs::read_to_string(dir.path().join("ecofeira_favorites.json")).unwrap();
    assert_eq!(raw, "[\"A1\"]");
}

#[tokio::test]
async fn test_clears_write_empty_values() {
    let server = MockServer::start().await;
    mount_catalog(&server, product_rows()).await;
    let dir = TempDir::new().unwrap();
    let mut app = start(&config_for(&server, dir.path())).await;

    app.toggle_favorite(&ProductId::new("A1"));
    app.add_to_list(&ProductId::new("A1")).unwrap();
    app.clear_favorites();
    app.clear_list();

    for key in ["ecofeira_favorites", "ecofeira_shopping_list"] {
        let raw = fs::read_to_string(dir.path().join(format!("{key}.json"))).unwrap();
        assert_eq!(raw, "[]");
    }
}

// ============================================================================
// Shopping list
// ============================================================================

#[tokio::test]
async fn test_same_name_from_two_stores_collapses_into_one_line() {
    let server = MockServer::start().await;
    mount_catalog(&server, product_rows()).await;
    let dir = TempDir::new().unwrap();
    let mut app = start(&config_for(&server, dir.path())).await;

    let first = app.add_to_list(&ProductId::new("A1")).unwrap();
    let second = app.add_to_list(&ProductId::new("B1")).unwrap();

    // Grouping is by name: the Super B offer is folded into the Super A line.
    assert_eq!(first, second);
    assert_eq!(app.shopping_list().len(), 1);
    let line = app.shopping_list().get(&first).unwrap();
    assert_eq!(line.quantity, 2);
    assert_eq!(line.original_store, "Super A");

    let optimized = app.optimize_list(&CheapestOfferOptimizer);
    assert_eq!(optimized.original_total, Price::from_cents(6000));
    assert_eq!(optimized.optimized_total, Price::from_cents(5000));
    assert_eq!(optimized.saving, Price::from_cents(1000));
}

#[tokio::test]
async fn test_quantity_floor_and_unknown_ids() {
    let server = MockServer::start().await;
    mount_catalog(&server, product_rows()).await;
    let dir = TempDir::new().unwrap();
    let mut app = start(&config_for(&server, dir.path())).await;

    let id = app.add_to_list(&ProductId::new("C1")).unwrap();
    for _ in 0..3 {
        app.update_quantity(&id, -1);
    }
    assert_eq!(app.shopping_list().get(&id).unwrap().quantity, 1);

    let unknown = ListItemId::new("missing");
    assert!(!app.update_quantity(&unknown, 1));
    assert!(!app.remove_from_list(&unknown));
    assert!(app.toggle_checked(&unknown).is_none());
    assert!(app.remove_from_list(&id));
    assert!(app.shopping_list().is_empty());
}
