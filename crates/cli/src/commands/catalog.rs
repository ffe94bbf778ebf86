//! Catalog browsing commands: search, promotions, compare, stores, scan.

use ecofeira_core::{ProductId, StoreId};
use ecofeira_storefront::listing::{ListingFilters, ListingSort, SuggestionKind};
use ecofeira_storefront::routes::Route;
use ecofeira_storefront::services::ScanResolution;
use ecofeira_storefront::state::AppStore;
use tokio::time::Instant;

use super::{CommandError, print_page, print_product};

/// Build listing filters from command-line values.
pub fn filters(
    query: String,
    category: Option<&str>,
    store: Option<&str>,
    only_promo: bool,
    sort: &str,
) -> ListingFilters {
    ListingFilters {
        query,
        category: category.and_then(ListingFilters::category_from_label),
        store: store.and_then(ListingFilters::store_from_label),
        only_promo,
        sort: ListingSort::parse(sort),
    }
}

/// Run a search and print one page of results.
pub fn search(app: &mut AppStore, filters: ListingFilters, page: usize) {
    let query = filters.query.clone();
    app.set_filters(filters);
    app.submit_search(&query);
    app.set_page(page);

    print_page(&app.listing_page());
}

/// Print what the search box would suggest for the query.
pub fn suggest(app: &mut AppStore, filters: ListingFilters) {
    app.set_filters(filters);

    let suggestions = app.search_suggestions();
    if suggestions.is_empty() {
        println!("Sem sugestões.");
        return;
    }
    for suggestion in suggestions {
        let kind = match suggestion.kind {
            SuggestionKind::Category => "categoria",
            SuggestionKind::Product => "produto",
        };
        println!("{:<10} {}", kind, suggestion.label);
    }
}

/// Promotions across every store.
pub fn promos(app: &mut AppStore, page: usize) {
    app.show_promotions();
    app.set_page(page);
    print_page(&app.listing_page());
}

/// Product detail with same-named offers.
pub fn compare(app: &AppStore, product_id: &str) -> Result<(), CommandError> {
    let detail = app
        .product_detail(&ProductId::new(product_id))
        .ok_or_else(|| CommandError::UnknownProduct(product_id.to_owned()))?;

    print_product(&detail.product);
    if let Some(store) = &detail.store {
        println!("{} ({}) - {}", store.name, store.status.label(), store.address());
    }
    if detail.is_favorite {
        println!("★ favorito");
    }
    println!("{}\n", detail.share_url);

    if detail.comparisons.is_empty() {
        println!("Nenhuma outra loja vende este produto.");
        return Ok(());
    }

    println!("Compare preços:");
    for comparison in &detail.comparisons {
        let best = if comparison.best_price { "  MELHOR PREÇO" } else { "" };
        println!(
            "  {:<24} {:>12}{}",
            comparison.product.supermarket,
            comparison.price.display(),
            best
        );
    }
    Ok(())
}

/// Store list, optionally filtered.
pub fn stores(app: &mut AppStore, query: String) {
    app.navigate(Route::Stores);
    app.set_store_query(query);

    let stores = app.stores();
    if stores.is_empty() {
        println!("Nenhum supermercado encontrado.");
        return;
    }
    for store in stores {
        println!(
            "{:<12} {:<28} {:<8} {}",
            store.id,
            store.name,
            store.status.label(),
            store.address()
        );
    }
}

/// One store's products.
pub fn store(
    app: &mut AppStore,
    store_id: &str,
    filters: ListingFilters,
    page: usize,
) -> Result<(), CommandError> {
    let id = StoreId::new(store_id);
    app.open_store(id.clone());
    app.set_filters(filters);
    app.set_page(page);

    let detail = app
        .store_detail(&id)
        .ok_or_else(|| CommandError::UnknownStore(store_id.to_owned()))?;

    println!("{} - {}", detail.store.name, detail.store.address());
    if let Some(flyer) = &detail.store.flyer_url {
        println!("Encarte: {flyer}");
    }
    println!("{}\n", detail.share_url);
    print_page(&detail.products);
    Ok(())
}

/// Resolve a scanned code; on a match, show the search it triggers.
pub fn scan(app: &mut AppStore, code: &str) {
    match app.on_scan_success(code) {
        ScanResolution::Matched(_) => print_page(&app.listing_page()),
        ScanResolution::Unmatched => {
            if let Some(notice) = app.scan_notice(Instant::now()) {
                println!("{}", notice.message);
            }
        }
    }
}
