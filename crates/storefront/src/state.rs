//! Application store.
//!
//! One controller owns all shopper state and exposes it through mutation
//! methods. Views hold a [`watch::Receiver`] from [`AppStore::subscribe`] and
//! re-read whatever they render when the revision changes.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut store = AppStore::open(&config)?;
//! store.finish_loading(CatalogClient::new(&config.catalog).load().await);
//!
//! store.submit_search("arroz");
//! for product in store.listing_page().items {
//!     println!("{} {}", product.name, product.effective_price());
//! }
//! ```

use std::sync::Arc;

use ecofeira_core::{ListItemId, Product, ProductId, Store, StoreId, UserProfile};
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use url::Url;

use crate::backup::{
    BackupBridge, BackupSnapshot, BackupTransport, BridgeError, BridgeEvent, BridgeState,
    RestorePayload,
};
use crate::catalog::Catalog;
use crate::compare::{Comparison, compare};
use crate::config::{BackupConfig, StorefrontConfig};
use crate::error::{AppError, add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::listing::{
    ListingFilters, ListingSort, Page, SearchSuggestion, favorite_products, filter_products,
    filter_stores, search_suggestions, store_product_suggestions, store_products,
    store_suggestions,
};
use crate::persistence::{FileStore, Persistence, Slot, StorageError};
use crate::routes::{Route, share_url};
use crate::services::{
    Favorites, ListOptimizer, MAX_RECENT_SEARCHES, MAX_SCANNED_CODES, OptimizedList,
    RecentHistory, ScanNotice, ScanResolution, ShoppingList, resolve_scan,
};

/// Product page data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDetail {
    pub product: Product,
    pub store: Option<Store>,
    pub comparisons: Vec<Comparison>,
    pub is_favorite: bool,
    pub share_url: String,
}

/// Store page data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreDetail {
    pub store: Store,
    pub products: Page<Product>,
    pub share_url: String,
}

/// All shopper state behind one owner.
pub struct AppStore {
    catalog: Catalog,
    loading: bool,
    persistence: Persistence,
    favorites: Favorites,
    shopping_list: ShoppingList,
    recent_searches: RecentHistory,
    scanned_history: RecentHistory,
    filters: ListingFilters,
    store_query: String,
    page: usize,
    route: Route,
    scan_notice: Option<ScanNotice>,
    user: Option<UserProfile>,
    bridge: BackupBridge,
    base_url: Url,
    revision: watch::Sender<u64>,
}

impl AppStore {
    /// Create a store in the loading state.
    ///
    /// Search and scan histories are read right away; favorites and the
    /// shopping list are read by [`Self::finish_loading`].
    #[must_use]
    pub fn new(persistence: Persistence, base_url: Url, backup: &BackupConfig) -> Self {
        let recent = persistence.read(Slot::RecentSearches);
        let scanned = persistence.read(Slot::ScannedHistory);
        let (revision, _) = watch::channel(0);

        Self {
            catalog: Catalog::default(),
            loading: true,
            persistence,
            favorites: Favorites::default(),
            shopping_list: ShoppingList::default(),
            recent_searches: RecentHistory::from_entries(MAX_RECENT_SEARCHES, recent),
            scanned_history: RecentHistory::from_entries(MAX_SCANNED_CODES, scanned),
            filters: ListingFilters::default(),
            store_query: String::new(),
            page: 1,
            route: Route::Home,
            scan_notice: None,
            user: None,
            bridge: BackupBridge::new(backup),
            base_url,
            revision,
        }
    }

    /// Create a store persisted to the configured data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created.
    pub fn open(config: &StorefrontConfig) -> Result<Self, StorageError> {
        let files = FileStore::open(&config.data_dir)?;
        let persistence = Persistence::new(Arc::new(files));
        Ok(Self::new(persistence, config.base_url.clone(), &config.backup))
    }

    /// Install the fetched catalog, restore favorites and the shopping list,
    /// and allow their writes from now on.
    pub fn finish_loading(&mut self, catalog: Catalog) {
        self.catalog = catalog;
        self.favorites = Favorites::from_ids(self.persistence.read(Slot::Favorites));
        self.shopping_list = ShoppingList::from_items(self.persistence.read(Slot::ShoppingList));
        self.persistence.mark_loaded();
        self.loading = false;

        info!(
            products = self.catalog.products.len(),
            favorites = self.favorites.len(),
            list_items = self.shopping_list.len(),
            "Storefront ready"
        );
        self.notify();
    }

    /// Follow state changes. The value is a revision counter.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    fn notify(&self) {
        self.revision.send_modify(|r| *r = r.wrapping_add(1));
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    #[must_use]
    pub const fn shopping_list(&self) -> &ShoppingList {
        &self.shopping_list
    }

    #[must_use]
    pub fn recent_searches(&self) -> &[String] {
        self.recent_searches.entries()
    }

    #[must_use]
    pub fn scanned_history(&self) -> &[String] {
        self.scanned_history.entries()
    }

    #[must_use]
    pub const fn filters(&self) -> &ListingFilters {
        &self.filters
    }

    #[must_use]
    pub const fn route(&self) -> &Route {
        &self.route
    }

    /// Current 1-based page.
    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    /// The unmatched-scan notice, if it is still visible at `now`.
    #[must_use]
    pub fn scan_notice(&self, now: Instant) -> Option<&ScanNotice> {
        self.scan_notice.as_ref().filter(|n| !n.is_expired(now))
    }

    #[must_use]
    pub const fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    #[must_use]
    pub const fn bridge(&self) -> &BackupBridge {
        &self.bridge
    }

    #[must_use]
    pub const fn bridge_state(&self) -> BridgeState {
        self.bridge.state()
    }

    // =========================================================================
    // Navigation and filters
    // =========================================================================

    /// Switch views. Changing views resets the page; opening the backup view
    /// mounts the bridge (or bounces to the profile when signed out) and
    /// leaving it unmounts the bridge.
    pub fn navigate(&mut self, route: Route) {
        let route = if route == Route::Backup && self.user.is_none() {
            debug!("Backup view needs a signed-in user, showing profile");
            Route::Profile
        } else {
            route
        };
        if route == self.route {
            if route == Route::Backup && self.bridge.state() == BridgeState::TimedOut {
                self.retry_backup();
            }
            return;
        }

        if self.route == Route::Backup {
            self.bridge.unmount();
        }
        if route == Route::Backup
            && let Err(e) = self.bridge.mount(self.user.as_ref(), Instant::now())
        {
            warn!(error = %e, "Could not open backup view");
        }

        debug!(from = %self.route, to = %route, "Navigate");
        self.route = route;
        self.page = 1;
        self.notify();
    }

    /// Navigate by path; unknown paths show home.
    pub fn navigate_to_path(&mut self, path: &str) {
        self.navigate(Route::parse(path));
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.filters.query = query.into();
        self.filters_changed();
    }

    pub fn set_category(&mut self, category: Option<String>) {
        self.filters.category = category;
        self.filters_changed();
    }

    pub fn set_store_filter(&mut self, store: Option<String>) {
        self.filters.store = store;
        self.filters_changed();
    }

    pub fn set_only_promo(&mut self, only_promo: bool) {
        self.filters.only_promo = only_promo;
        self.filters_changed();
    }

    pub fn set_sort(&mut self, sort: ListingSort) {
        self.filters.sort = sort;
        self.filters_changed();
    }

    /// Replace every filter at once.
    pub fn set_filters(&mut self, filters: ListingFilters) {
        self.filters = filters;
        self.filters_changed();
    }

    fn filters_changed(&mut self) {
        self.page = 1;
        self.notify();
    }

    /// Jump to a page. Pages past the end render empty.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
        self.notify();
    }

    /// Search box submit: set the query, remember it and show the listing.
    pub fn submit_search(&mut self, term: &str) {
        self.set_query(term);
        self.save_search(term);
        self.navigate(Route::Listing);
    }

    /// "Promotions" shortcut: promo rows across every product.
    pub fn show_promotions(&mut self) {
        self.filters.query.clear();
        self.filters.only_promo = true;
        self.filters_changed();
        self.navigate(Route::Listing);
    }

    /// Open a store page with its filters reset.
    pub fn open_store(&mut self, id: StoreId) {
        self.filters.category = None;
        self.filters.query.clear();
        self.filters.sort = ListingSort::None;
        self.filters_changed();
        self.navigate(Route::Store(id));
    }

    pub fn set_store_query(&mut self, query: impl Into<String>) {
        self.store_query = query.into();
        self.notify();
    }

    // =========================================================================
    // Views
    // =========================================================================

    /// Full filtered listing.
    #[must_use]
    pub fn listing(&self) -> Vec<Product> {
        filter_products(&self.catalog.products, &self.filters)
    }

    /// Current page of the listing.
    #[must_use]
    pub fn listing_page(&self) -> Page<Product> {
        Page::of(&self.listing(), self.page)
    }

    /// Suggestions under the search box.
    #[must_use]
    pub fn search_suggestions(&self) -> Vec<SearchSuggestion> {
        search_suggestions(&self.catalog.products, &self.filters.query)
    }

    /// Store page data, using the shared query, category and sort.
    #[must_use]
    pub fn store_detail(&self, id: &StoreId) -> Option<StoreDetail> {
        let store = self.catalog.store(id)?.clone();
        let products = store_products(
            &self.catalog.products,
            &store,
            &self.filters.query,
            self.filters.category.as_deref(),
            self.filters.sort,
        );

        Some(StoreDetail {
            share_url: share_url(&self.base_url, &Route::Store(store.id.clone())),
            products: Page::of(&products, self.page),
            store,
        })
    }

    /// Product-name suggestions on a store page.
    #[must_use]
    pub fn store_search_suggestions(&self, id: &StoreId) -> Vec<String> {
        self.catalog.store(id).map_or_else(Vec::new, |store| {
            store_product_suggestions(&self.catalog.products, store, &self.filters.query)
        })
    }

    /// Store list filtered by the store search box.
    #[must_use]
    pub fn stores(&self) -> Vec<Store> {
        filter_stores(&self.catalog.stores, &self.store_query)
    }

    /// Suggestions under the store search box.
    #[must_use]
    pub fn store_suggestions(&self) -> Vec<&Store> {
        store_suggestions(&self.catalog.stores, &self.store_query)
    }

    /// Product page data with price comparisons.
    #[must_use]
    pub fn product_detail(&self, id: &ProductId) -> Option<ProductDetail> {
        let product = self.catalog.product(id)?.clone();

        Some(ProductDetail {
            store: self.catalog.store_named(&product.supermarket).cloned(),
            comparisons: compare(&product, &self.catalog.products),
            is_favorite: self.favorites.contains(id),
            share_url: share_url(&self.base_url, &Route::product(&product)),
            product,
        })
    }

    /// Current page of favorited products.
    #[must_use]
    pub fn favorites_page(&self) -> Page<Product> {
        let products = favorite_products(&self.catalog.products, self.favorites.ids());
        Page::of(&products, self.page)
    }

    /// Cheapest-offer suggestions for the shopping list.
    #[must_use]
    pub fn optimize_list(&self, optimizer: &impl ListOptimizer) -> OptimizedList {
        optimizer.optimize(self.shopping_list.items(), &self.catalog.products)
    }

    // =========================================================================
    // Favorites
    // =========================================================================

    /// Returns whether the product is now a favorite.
    pub fn toggle_favorite(&mut self, id: &ProductId) -> bool {
        let added = self.favorites.toggle(id);
        add_breadcrumb(
            "favorites",
            if added { "Added favorite" } else { "Removed favorite" },
            Some(&[("product", id.as_str())]),
        );
        self.persistence.write(Slot::Favorites, self.favorites.ids());
        self.notify();
        added
    }

    pub fn clear_favorites(&mut self) {
        self.favorites.clear();
        self.persistence.write_now(Slot::Favorites, self.favorites.ids());
        self.notify();
    }

    // =========================================================================
    // Shopping list
    // =========================================================================

    /// Add one unit of a catalog product.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the product is not in the catalog.
    pub fn add_to_list(&mut self, id: &ProductId) -> Result<ListItemId, AppError> {
        let product = self
            .catalog
            .product(id)
            .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

        add_breadcrumb(
            "list",
            "Added to shopping list",
            Some(&[("product", product.name.as_str())]),
        );
        let item_id = self.shopping_list.add(product);
        self.list_changed();
        Ok(item_id)
    }

    /// Returns `false` for an unknown line.
    pub fn update_quantity(&mut self, id: &ListItemId, delta: i32) -> bool {
        let changed = self.shopping_list.update_quantity(id, delta);
        if changed {
            self.list_changed();
        }
        changed
    }

    /// Returns `false` for an unknown line.
    pub fn remove_from_list(&mut self, id: &ListItemId) -> bool {
        let changed = self.shopping_list.remove(id);
        if changed {
            self.list_changed();
        }
        changed
    }

    /// Returns the new checked flag, or `None` for an unknown line.
    pub fn toggle_checked(&mut self, id: &ListItemId) -> Option<bool> {
        let checked = self.shopping_list.toggle_checked(id)?;
        self.list_changed();
        Some(checked)
    }

    pub fn clear_list(&mut self) {
        self.shopping_list.clear();
        self.persistence
            .write_now(Slot::ShoppingList, self.shopping_list.items());
        self.notify();
    }

    fn list_changed(&self) {
        self.persistence
            .write(Slot::ShoppingList, self.shopping_list.items());
        self.notify();
    }

    // =========================================================================
    // History and scanning
    // =========================================================================

    fn save_search(&mut self, term: &str) {
        if self.recent_searches.push(term) {
            self.persistence
                .write(Slot::RecentSearches, self.recent_searches.entries());
        }
    }

    /// Drop one recent search (exact match).
    pub fn remove_recent_search(&mut self, term: &str) {
        if self.recent_searches.remove(term) {
            self.persistence
                .write(Slot::RecentSearches, self.recent_searches.entries());
            self.notify();
        }
    }

    /// A code was decoded by the scanner.
    ///
    /// A match is recorded, searched for and shown in the listing; otherwise
    /// only the transient notice is raised.
    pub fn on_scan_success(&mut self, code: &str) -> ScanResolution {
        let resolution = resolve_scan(code, &self.catalog.products);

        match &resolution {
            ScanResolution::Matched(code) => {
                add_breadcrumb("scan", "Scanned code matched", Some(&[("code", code.as_str())]));
                if self.scanned_history.push(code) {
                    self.persistence
                        .write(Slot::ScannedHistory, self.scanned_history.entries());
                }
                self.submit_search(code);
            }
            ScanResolution::Unmatched => {
                info!(code = %code, "Scanned code matched nothing");
                self.scan_notice = Some(ScanNotice::unmatched(Instant::now()));
                self.notify();
            }
        }
        resolution
    }

    /// Drop an expired scan notice and notify subscribers.
    ///
    /// [`AppStore::scan_notice`] already hides an expired notice; this only
    /// tells views to re-render.
    pub fn expire_notices(&mut self, now: Instant) {
        if self.scan_notice.as_ref().is_some_and(|n| n.is_expired(now)) {
            self.scan_notice = None;
            self.notify();
        }
    }

    // =========================================================================
    // Identity and backup
    // =========================================================================

    /// The identity provider reported a new user (or sign-out).
    pub fn set_user(&mut self, user: Option<UserProfile>) {
        match &user {
            Some(profile) => set_sentry_user(&profile.uid, profile.email.as_deref()),
            None => clear_sentry_user(),
        }
        let changed = self.user != user;
        self.user = user;

        if self.route != Route::Backup {
            self.notify();
        } else if self.user.is_none() {
            self.navigate(Route::Profile);
        } else {
            if changed {
                // A mounted bridge exports the user it captured at mount.
                self.remount_backup();
            }
            self.notify();
        }
    }

    /// Reconnect a backup view whose partner timed out.
    ///
    /// Opens the backup view when it is not showing. Does nothing while the
    /// handshake is still pending or already done.
    pub fn retry_backup(&mut self) {
        if self.route != Route::Backup {
            self.navigate(Route::Backup);
            return;
        }
        if self.bridge.state() == BridgeState::TimedOut {
            self.remount_backup();
            self.notify();
        }
    }

    fn remount_backup(&mut self) {
        self.bridge.unmount();
        if let Err(e) = self.bridge.mount(self.user.as_ref(), Instant::now()) {
            warn!(error = %e, "Could not reconnect backup view");
        }
    }

    /// Local data as the backup partner sees it.
    #[must_use]
    pub fn backup_snapshot(&self) -> BackupSnapshot {
        BackupSnapshot {
            favorites: self.favorites.ids().to_vec(),
            shopping_list: self.shopping_list.items().to_vec(),
        }
    }

    /// Feed a message from the embedded partner frame into the bridge.
    ///
    /// # Errors
    ///
    /// Returns the bridge error for malformed or out-of-order messages and
    /// failed exports. State is unchanged in those cases.
    pub fn handle_backup_message(
        &mut self,
        origin: &str,
        body: &str,
        transport: &impl BackupTransport,
    ) -> Result<BridgeEvent, BridgeError> {
        let snapshot = self.backup_snapshot();
        let event = self
            .bridge
            .handle_message(origin, body, &snapshot, transport)?;

        match &event {
            BridgeEvent::Restore(payload) => self.apply_restore(payload),
            BridgeEvent::Exported => self.notify(),
            BridgeEvent::Ignored => {}
        }
        Ok(event)
    }

    fn apply_restore(&mut self, payload: &RestorePayload) {
        if let Some(ids) = &payload.favorites {
            self.favorites = Favorites::from_ids(ids.clone());
            self.persistence.write_now(Slot::Favorites, self.favorites.ids());
        }
        if let Some(items) = &payload.shopping_list {
            self.shopping_list = ShoppingList::from_items(items.clone());
            self.persistence
                .write_now(Slot::ShoppingList, self.shopping_list.items());
        }
        self.notify();
    }

    /// Give up on a partner that never answered. Returns whether it timed out.
    pub fn check_backup_timeout(&mut self, now: Instant) -> bool {
        let timed_out = self.bridge.check_timeout(now);
        if timed_out {
            self.notify();
        }
        timed_out
    }
}

impl std::fmt::Debug for AppStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppStore")
            .field("loading", &self.loading)
            .field("route", &self.route)
            .field("page", &self.page)
            .field("favorites", &self.favorites.len())
            .field("list_items", &self.shopping_list.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use ecofeira_core::Price;

    use super::*;
    use crate::backup::ChannelTransport;
    use crate::persistence::{KeyValueStore, MemoryStore};
    use crate::test_support::{product, promo, store};

    const PARTNER: &str = "https://ecofeira-backup.vercel.app";

    fn catalog() -> Catalog {
        Catalog {
            products: vec![
                product("A1", "Arroz 5kg", "Grãos", "Super A", 3000),
                promo("B1", "Arroz 5kg", "Grãos", "Super B", 2800, 2500),
                product("A2", "Leite Integral", "Laticínios", "Super A", 500),
                promo("B2", "Café Pilão", "Mercearia", "Super B", 1890, 1500),
            ],
            stores: vec![store("s1", "Super A", "Centro"), store("s2", "Super B", "Boa Viagem")],
            ..Catalog::default()
        }
    }

    fn app_with(kv: Arc<MemoryStore>) -> AppStore {
        AppStore::new(
            Persistence::new(kv),
            Url::parse("https://ecofeira.app").unwrap(),
            &BackupConfig {
                partner_origin: Url::parse(PARTNER).unwrap(),
                handshake_timeout: Duration::from_secs(30),
            },
        )
    }

    fn loaded_app() -> (Arc<MemoryStore>, AppStore) {
        let kv = Arc::new(MemoryStore::default());
        let mut app = app_with(kv.clone());
        app.finish_loading(catalog());
        (kv, app)
    }

    fn user() -> UserProfile {
        UserProfile {
            uid: "u1".to_owned(),
            display_name: Some("Ana".to_owned()),
            email: None,
            photo_url: None,
        }
    }

    #[test]
    fn test_writes_before_load_do_not_clobber_storage() {
        let kv = Arc::new(MemoryStore::default());
        kv.set("ecofeira_favorites", r#"["A2"]"#).unwrap();
        let mut app = app_with(kv.clone());

        app.toggle_favorite(&ProductId::new("B1"));
        assert_eq!(kv.get("ecofeira_favorites").unwrap().as_deref(), Some(r#"["A2"]"#));

        app.finish_loading(catalog());
        assert!(app.favorites().contains(&ProductId::new("A2")));
        assert!(!app.is_loading());
    }

    #[test]
    fn test_filter_changes_reset_page_and_notify() {
        let (_kv, mut app) = loaded_app();
        let rx = app.subscribe();
        let before = *rx.borrow();

        app.set_page(3);
        assert_eq!(app.page(), 3);
        app.set_only_promo(true);
        assert_eq!(app.page(), 1);
        assert!(*rx.borrow() > before);
        assert_eq!(app.listing().len(), 2);

        app.set_page(2);
        app.navigate(Route::Favorites);
        assert_eq!(app.page(), 1);
    }

    #[test]
    fn test_submit_search_records_and_navigates() {
        let (kv, mut app) = loaded_app();
        app.submit_search("   ");
        app.submit_search("arroz");

        assert_eq!(app.route(), &Route::Listing);
        assert_eq!(app.recent_searches(), &["arroz"]);
        assert_eq!(
            kv.get("ecofeira_recent_searches").unwrap().as_deref(),
            Some(r#"["arroz"]"#)
        );
        assert_eq!(app.listing_page().items.len(), 2);

        app.remove_recent_search("arroz");
        assert!(app.recent_searches().is_empty());
    }

    #[test]
    fn test_show_promotions() {
        let (_kv, mut app) = loaded_app();
        app.set_query("leite");
        app.show_promotions();
        assert!(app.filters().query.is_empty());
        assert!(app.filters().only_promo);
        assert_eq!(app.route(), &Route::Listing);
    }

    #[test]
    fn test_open_store_resets_filters() {
        let (_kv, mut app) = loaded_app();
        app.set_query("cafe");
        app.set_category(Some("Mercearia".to_owned()));
        app.set_sort(ListingSort::PriceAsc);

        app.open_store(StoreId::new("s1"));
        assert_eq!(app.route(), &Route::Store(StoreId::new("s1")));
        let detail = app.store_detail(&StoreId::new("s1")).unwrap();
        assert_eq!(detail.products.total_items, 2);
        assert_eq!(detail.share_url, "https://ecofeira.app/#/supermercado/s1");
    }

    #[test]
    fn test_product_detail_compares_prices() {
        let (_kv, mut app) = loaded_app();
        app.toggle_favorite(&ProductId::new("A1"));

        let detail = app.product_detail(&ProductId::new("A1")).unwrap();
        assert!(detail.is_favorite);
        assert_eq!(detail.store.unwrap().id.as_str(), "s1");
        let best = detail.comparisons.first().unwrap();
        assert_eq!(best.product.id.as_str(), "B1");
        assert!(best.best_price);
        assert_eq!(detail.share_url, "https://ecofeira.app/#/super-a/graos/A1/arroz-5kg");
    }

    #[test]
    fn test_list_flow_persists() {
        let (kv, mut app) = loaded_app();
        let id = app.add_to_list(&ProductId::new("A1")).unwrap();
        // Same name from another store merges into the first line.
        assert_eq!(app.add_to_list(&ProductId::new("B1")).unwrap(), id);
        assert!(app.update_quantity(&id, -5));
        assert_eq!(app.shopping_list().get(&id).unwrap().quantity, 1);
        assert_eq!(app.toggle_checked(&id), Some(true));

        let saved = kv.get("ecofeira_shopping_list").unwrap().unwrap();
        assert!(saved.contains("\"checked\":true"));

        assert!(matches!(
            app.add_to_list(&ProductId::new("missing")),
            Err(AppError::NotFound(_))
        ));

        app.clear_list();
        assert_eq!(kv.get("ecofeira_shopping_list").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_optimize_list_uses_catalog() {
        let (_kv, mut app) = loaded_app();
        app.add_to_list(&ProductId::new("A1")).unwrap();
        let result = app.optimize_list(&crate::services::CheapestOfferOptimizer);
        assert_eq!(result.saving, Price::from_cents(500));
    }

    #[test]
    fn test_matched_scan_searches_and_records() {
        let (kv, mut app) = loaded_app();
        let resolution = app.on_scan_success("B2");

        assert_eq!(resolution, ScanResolution::Matched("B2".to_owned()));
        assert_eq!(app.scanned_history(), &["B2"]);
        assert_eq!(app.recent_searches(), &["B2"]);
        assert_eq!(app.filters().query, "B2");
        assert_eq!(app.route(), &Route::Listing);
        assert_eq!(
            kv.get("ecofeira_scanned_history").unwrap().as_deref(),
            Some(r#"["B2"]"#)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_unmatched_scan_notice_clears_after_four_seconds() {
        let (_kv, mut app) = loaded_app();
        app.navigate(Route::Stores);

        assert_eq!(app.on_scan_success("7891000"), ScanResolution::Unmatched);
        assert!(app.scan_notice(Instant::now()).is_some());
        assert_eq!(app.route(), &Route::Stores);
        assert!(app.scanned_history().is_empty());
        assert!(app.recent_searches().is_empty());
        assert!(app.filters().query.is_empty());

        tokio::time::advance(Duration::from_millis(3999)).await;
        app.expire_notices(Instant::now());
        assert!(app.scan_notice(Instant::now()).is_some());

        tokio::time::advance(Duration::from_millis(1)).await;
        app.expire_notices(Instant::now());
        assert!(app.scan_notice(Instant::now()).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_scan_notice_hidden_after_four_seconds_without_sweep() {
        let (_kv, mut app) = loaded_app();
        app.on_scan_success("7891000");

        tokio::time::advance(Duration::from_secs(4)).await;
        assert!(app.scan_notice(Instant::now()).is_none());
    }

    #[test]
    fn test_scan_history_keeps_raw_code() {
        let (_kv, mut app) = loaded_app();
        app.on_scan_success("arroz ");

        assert_eq!(app.scanned_history(), &["arroz "]);
        assert_eq!(app.filters().query, "arroz ");
    }

    #[test]
    fn test_backup_route_requires_user() {
        let (_kv, mut app) = loaded_app();
        app.navigate(Route::Backup);
        assert_eq!(app.route(), &Route::Profile);
        assert_eq!(app.bridge_state(), BridgeState::Disconnected);

        app.set_user(Some(user()));
        app.navigate(Route::Backup);
        assert!(matches!(app.bridge_state(), BridgeState::Connecting { .. }));

        app.set_user(None);
        assert_eq!(app.route(), &Route::Profile);
        assert_eq!(app.bridge_state(), BridgeState::Disconnected);
    }

    #[tokio::test]
    async fn test_backup_export_and_restore() {
        let (kv, mut app) = loaded_app();
        app.toggle_favorite(&ProductId::new("A2"));
        app.set_user(Some(user()));
        app.navigate(Route::Backup);

        let (transport, mut rx) = ChannelTransport::new();
        let event = app
            .handle_backup_message(PARTNER, r#"{"type":"READY"}"#, &transport)
            .unwrap();
        assert_eq!(event, BridgeEvent::Exported);
        let (_, crate::backup::OutboundMessage::BackupInit(payload)) = rx.recv().await.unwrap();
        assert_eq!(payload.favorites, vec![ProductId::new("A2")]);

        let body = r#"{"type":"RESTORE_DATA","payload":{"favorites":["B1","B2"],"shoppingList":[]}}"#;
        app.handle_backup_message(PARTNER, body, &transport).unwrap();
        assert_eq!(app.favorites().ids(), &[ProductId::new("B1"), ProductId::new("B2")]);
        assert_eq!(
            kv.get("ecofeira_favorites").unwrap().as_deref(),
            Some(r#"["B1","B2"]"#)
        );
        assert!(app.shopping_list().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_backup_timeout() {
        let (_kv, mut app) = loaded_app();
        app.set_user(Some(user()));
        app.navigate(Route::Backup);

        tokio::time::advance(Duration::from_secs(31)).await;
        assert!(app.check_backup_timeout(Instant::now()));
        assert_eq!(app.bridge_state(), BridgeState::TimedOut);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backup_retry_after_timeout_reconnects_in_place() {
        let (_kv, mut app) = loaded_app();
        app.set_user(Some(user()));
        app.navigate(Route::Backup);
        tokio::time::advance(Duration::from_secs(31)).await;
        assert!(app.check_backup_timeout(Instant::now()));

        app.navigate(Route::Backup);
        assert_eq!(app.route(), &Route::Backup);
        assert!(matches!(app.bridge_state(), BridgeState::Connecting { .. }));

        tokio::time::advance(Duration::from_secs(31)).await;
        assert!(app.check_backup_timeout(Instant::now()));
        app.retry_backup();
        assert!(matches!(app.bridge_state(), BridgeState::Connecting { .. }));

        let (transport, _rx) = ChannelTransport::new();
        let event = app
            .handle_backup_message(PARTNER, r#"{"type":"READY"}"#, &transport)
            .unwrap();
        assert_eq!(event, BridgeEvent::Exported);
    }

    #[tokio::test]
    async fn test_switching_user_while_on_backup_exports_new_profile() {
        let (_kv, mut app) = loaded_app();
        app.set_user(Some(user()));
        app.navigate(Route::Backup);

        let other = UserProfile {
            uid: "u2".to_owned(),
            display_name: Some("Bia".to_owned()),
            ..user()
        };
        app.set_user(Some(other));
        assert_eq!(app.route(), &Route::Backup);
        assert!(matches!(app.bridge_state(), BridgeState::Connecting { .. }));

        let (transport, mut rx) = ChannelTransport::new();
        app.handle_backup_message(PARTNER, r#"{"type":"READY"}"#, &transport)
            .unwrap();
        let (_, crate::backup::OutboundMessage::BackupInit(payload)) = rx.recv().await.unwrap();
        assert_eq!(payload.user.uid, "u2");
    }
}
