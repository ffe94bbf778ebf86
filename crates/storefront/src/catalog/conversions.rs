//! Spreadsheet rows to domain types.
//!
//! Cells arrive loosely typed: prices as numbers or `"R$ 4,99"`, flags as
//! booleans, `"sim"` or `"TRUE"`, image lists as arrays or comma-separated
//! text. Rows without an id or name are skipped with a warning.

use ecofeira_core::{Banner, BannerId, Price, Product, ProductId, Store, StoreId, StoreStatus};
use serde_json::{Map, Value};
use tracing::warn;

type Row = Map<String, Value>;

/// Convert product rows, dropping unusable ones.
#[must_use]
pub fn convert_products(rows: &[Value]) -> Vec<Product> {
    rows.iter()
        .filter_map(Value::as_object)
        .filter_map(convert_product)
        .collect()
}

/// Convert supermarket rows, dropping unusable ones.
#[must_use]
pub fn convert_stores(rows: &[Value]) -> Vec<Store> {
    rows.iter()
        .filter_map(Value::as_object)
        .filter_map(convert_store)
        .collect()
}

/// Convert banner rows, dropping rows without an image.
#[must_use]
pub fn convert_banners(rows: &[Value]) -> Vec<Banner> {
    rows.iter()
        .filter_map(Value::as_object)
        .enumerate()
        .filter_map(|(index, row)| convert_banner(index, row))
        .collect()
}

/// Convert popular-search rows: plain strings or objects with a `term` cell.
#[must_use]
pub fn convert_suggestions(rows: &[Value]) -> Vec<String> {
    rows.iter()
        .filter_map(|row| match row {
            Value::String(s) => Some(s.trim().to_owned()),
            Value::Object(obj) => text(obj, "term"),
            _ => None,
        })
        .filter(|s| !s.is_empty())
        .collect()
}

fn convert_product(row: &Row) -> Option<Product> {
    let Some(id) = text(row, "id") else {
        warn!(row = ?row, "Skipping product row without id");
        return None;
    };
    let Some(name) = text(row, "name") else {
        warn!(id = %id, "Skipping product row without name");
        return None;
    };

    let normal_price = match price(row, "normalPrice") {
        Ok(p) => p,
        Err(reason) => {
            warn!(id = %id, reason = %reason, "Skipping product row with bad normal price");
            return None;
        }
    };
    let promo_price = price(row, "promoPrice").unwrap_or(Price::ZERO);
    let mut is_promo = flag(row, "isPromo");

    if is_promo && (promo_price.is_zero() || promo_price > normal_price) {
        warn!(
            id = %id,
            normal = %normal_price,
            promo = %promo_price,
            "Promo price is not below normal price, ignoring promotion"
        );
        is_promo = false;
    }

    Some(Product {
        id: ProductId::new(id),
        name,
        category: text(row, "category").unwrap_or_default(),
        brand: text(row, "brand").unwrap_or_default(),
        supermarket: text(row, "supermarket").unwrap_or_default(),
        normal_price,
        is_promo,
        promo_price,
        image_url: text(row, "imageUrl").unwrap_or_default(),
        additional_images: list(row, "additionalImages"),
        description: text(row, "description").unwrap_or_default(),
        last_update: text(row, "lastUpdate").unwrap_or_default(),
    })
}

fn convert_store(row: &Row) -> Option<Store> {
    let (Some(id), Some(name)) = (text(row, "id"), text(row, "name")) else {
        warn!(row = ?row, "Skipping supermarket row without id or name");
        return None;
    };

    Some(Store {
        id: StoreId::new(id),
        name,
        logo: text(row, "logo").unwrap_or_default(),
        street: text(row, "street").unwrap_or_default(),
        neighborhood: text(row, "neighborhood").unwrap_or_default(),
        city: text(row, "city").unwrap_or_default(),
        status: text(row, "status")
            .map(|label| StoreStatus::parse_label(&label))
            .unwrap_or_default(),
        flyer_url: text(row, "flyerUrl"),
    })
}

fn convert_banner(index: usize, row: &Row) -> Option<Banner> {
    let image_url = text(row, "imageUrl")?;
    let id = text(row, "id").unwrap_or_else(|| format!("banner-{index}"));

    Some(Banner {
        id: BannerId::new(id),
        image_url,
        title: text(row, "title"),
        link: text(row, "link"),
    })
}

// =============================================================================
// Cell helpers
// =============================================================================

/// Non-empty trimmed text; numbers are rendered as text (numeric ids).
fn text(row: &Row, key: &str) -> Option<String> {
    let value = match row.get(key)? {
        Value::String(s) => s.trim().to_owned(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!value.is_empty()).then_some(value)
}

fn price(row: &Row, key: &str) -> Result<Price, String> {
    match row.get(key) {
        Some(Value::Number(n)) => Price::parse(&n.to_string()).map_err(|e| e.to_string()),
        Some(Value::String(s)) => Price::parse(s).map_err(|e| e.to_string()),
        Some(other) => Err(format!("unexpected cell {other}")),
        None => Err(format!("missing {key}")),
    }
}

fn flag(row: &Row, key: &str) -> bool {
    match row.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
        Some(Value::String(s)) => matches!(
            s.trim().to_lowercase().as_str(),
            "true" | "sim" | "s" | "yes" | "1" | "x"
        ),
        _ => false,
    }
}

fn list(row: &Row, key: &str) -> Vec<String> {
    match row.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect(),
        _ => Vec::new(),
    }
}
