//! HTTP client for the spreadsheet-backed catalog source.

use std::sync::Arc;
use std::time::Duration;

use ecofeira_core::{Banner, Product, Store};
use moka::future::Cache;
use secrecy::ExposeSecret;
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use super::cache::CacheValue;
use super::conversions::{convert_banners, convert_products, convert_stores, convert_suggestions};
use super::{Catalog, CatalogError, Sheet};
use crate::config::CatalogConfig;

// =============================================================================
// CatalogClient
// =============================================================================

/// Client for the catalog source.
///
/// Each tab is cached for 5 minutes after a successful fetch.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    endpoint: Url,
    api_key: Option<String>,
    cache: Cache<Sheet, CacheValue>,
}

impl CatalogClient {
    /// Create a new catalog client.
    #[must_use]
    pub fn new(config: &CatalogConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(16)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                endpoint: config.endpoint.clone(),
                api_key: config
                    .api_key
                    .as_ref()
                    .map(|key| key.expose_secret().to_string()),
                cache,
            }),
        }
    }

    /// Fetch every tab concurrently and assemble the catalog.
    ///
    /// Never fails: a tab that cannot be fetched is logged and left empty, so
    /// the storefront stays usable with whatever did load.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Catalog {
        let (products, stores, main_banners, grid_banners, suggestions) = tokio::join!(
            self.products(),
            self.stores(),
            self.banners(Sheet::MainBanners),
            self.banners(Sheet::GridBanners),
            self.popular_suggestions(),
        );

        let catalog = Catalog {
            products: or_empty(Sheet::Products, products),
            stores: or_empty(Sheet::Supermarkets, stores),
            main_banners: or_empty(Sheet::MainBanners, main_banners),
            grid_banners: or_empty(Sheet::GridBanners, grid_banners),
            popular_suggestions: or_empty(Sheet::Suggestions, suggestions),
        };

        tracing::info!(
            products = catalog.products.len(),
            stores = catalog.stores.len(),
            "Catalog loaded"
        );
        catalog
    }

    /// Fetch all product offers.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a row list.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Vec<Product>, CatalogError> {
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&Sheet::Products).await
        {
            debug!("Cache hit for products");
            return Ok(products.as_ref().clone());
        }

        let rows = self.fetch_rows(Sheet::Products).await?;
        let products = convert_products(&rows);

        self.inner
            .cache
            .insert(
                Sheet::Products,
                CacheValue::Products(Arc::new(products.clone())),
            )
            .await;

        Ok(products)
    }

    /// Fetch all supermarkets.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a row list.
    #[instrument(skip(self))]
    pub async fn stores(&self) -> Result<Vec<Store>, CatalogError> {
        if let Some(CacheValue::Stores(stores)) = self.inner.cache.get(&Sheet::Supermarkets).await {
            debug!("Cache hit for supermarkets");
            return Ok(stores.as_ref().clone());
        }

        let rows = self.fetch_rows(Sheet::Supermarkets).await?;
        let stores = convert_stores(&rows);

        self.inner
            .cache
            .insert(Sheet::Supermarkets, CacheValue::Stores(Arc::new(stores.clone())))
            .await;

        Ok(stores)
    }

    /// Fetch one of the banner tabs.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a row list.
    #[instrument(skip(self))]
    pub async fn banners(&self, sheet: Sheet) -> Result<Vec<Banner>, CatalogError> {
        if let Some(CacheValue::Banners(banners)) = self.inner.cache.get(&sheet).await {
            debug!("Cache hit for banners");
            return Ok(banners.as_ref().clone());
        }

        let rows = self.fetch_rows(sheet).await?;
        let banners = convert_banners(&rows);

        self.inner
            .cache
            .insert(sheet, CacheValue::Banners(Arc::new(banners.clone())))
            .await;

        Ok(banners)
    }

    /// Fetch the popular search terms shown under the search box.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a row list.
    #[instrument(skip(self))]
    pub async fn popular_suggestions(&self) -> Result<Vec<String>, CatalogError> {
        if let Some(CacheValue::Suggestions(terms)) =
            self.inner.cache.get(&Sheet::Suggestions).await
        {
            debug!("Cache hit for suggestions");
            return Ok(terms.as_ref().clone());
        }

        let rows = self.fetch_rows(Sheet::Suggestions).await?;
        let terms = convert_suggestions(&rows);

        self.inner
            .cache
            .insert(
                Sheet::Suggestions,
                CacheValue::Suggestions(Arc::new(terms.clone())),
            )
            .await;

        Ok(terms)
    }

    /// GET one tab and return its rows.
    async fn fetch_rows(&self, sheet: Sheet) -> Result<Vec<Value>, CatalogError> {
        let url = self.sheet_url(sheet);

        let response = self.inner.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                sheet = %sheet,
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Catalog source returned non-success status"
            );
            return Err(CatalogError::Status { sheet, status });
        }

        let value: Value = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                sheet = %sheet,
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })?;

        // Accept a bare array or the `{ "data": [...] }` envelope.
        match value {
            Value::Array(rows) => Ok(rows),
            Value::Object(mut obj) => match obj.remove("data") {
                Some(Value::Array(rows)) => Ok(rows),
                _ => Err(CatalogError::UnexpectedShape(sheet)),
            },
            _ => Err(CatalogError::UnexpectedShape(sheet)),
        }
    }

    fn sheet_url(&self, sheet: Sheet) -> Url {
        let mut url = self.inner.endpoint.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("sheet", sheet.as_str());
            if let Some(key) = &self.inner.api_key {
                query.append_pair("key", key);
            }
        }
        url
    }
}

/// Degrade a failed tab to an empty collection.
fn or_empty<T>(sheet: Sheet, result: Result<Vec<T>, CatalogError>) -> Vec<T> {
    result.unwrap_or_else(|e| {
        tracing::error!(sheet = %sheet, error = %e, "Failed to load catalog tab");
        Vec::new()
    })
}
