//! Catalog product offer.
//!
//! A product row is one store's offer: the same item sold by two supermarkets
//! appears twice, with different ids and the same name.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// A single store's offer for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub brand: String,
    /// Name of the store selling this offer.
    pub supermarket: String,
    pub normal_price: Price,
    #[serde(default)]
    pub is_promo: bool,
    #[serde(default)]
    pub promo_price: Price,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub additional_images: Vec<String>,
    #[serde(default)]
    pub description: String,
    /// Free-form "last updated" label as entered in the spreadsheet.
    #[serde(default)]
    pub last_update: String,
}

impl Product {
    /// The price a shopper pays today: promo price while on promotion.
    #[must_use]
    pub const fn effective_price(&self) -> Price {
        if self.is_promo {
            self.promo_price
        } else {
            self.normal_price
        }
    }

    /// Fractional discount `(normal - promo) / normal`.
    ///
    /// Zero for non-promo rows and for rows with a zero normal price.
    #[must_use]
    pub fn discount_ratio(&self) -> Decimal {
        if !self.is_promo || self.normal_price.is_zero() {
            return Decimal::ZERO;
        }
        (self.normal_price.amount() - self.promo_price.amount()) / self.normal_price.amount()
    }

    /// Whole-percent discount shown on the "% OFF" badge.
    #[must_use]
    pub fn discount_percent(&self) -> u32 {
        use rust_decimal::prelude::ToPrimitive;

        (self.discount_ratio() * Decimal::ONE_HUNDRED)
            .round()
            .to_u32()
            .unwrap_or(0)
    }

    /// All non-empty images, main image first.
    #[must_use]
    pub fn images(&self) -> Vec<&str> {
        std::iter::once(self.image_url.as_str())
            .chain(self.additional_images.iter().map(String::as_str))
            .filter(|url| !url.is_empty())
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Build a product with sensible defaults for tests.
    pub fn product(id: &str, name: &str, store: &str, normal_cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_owned(),
            category: "Mercearia".to_owned(),
            brand: String::new(),
            supermarket: store.to_owned(),
            normal_price: Price::from_cents(normal_cents),
            is_promo: false,
            promo_price: Price::ZERO,
            image_url: String::new(),
            additional_images: Vec::new(),
            description: String::new(),
            last_update: String::new(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::fixtures::product;
    use super::*;

    #[test]
    fn test_effective_price_prefers_promo() {
        let mut p = product("B1", "Arroz 5kg", "Super B", 2800);
        assert_eq!(p.effective_price(), Price::from_cents(2800));

        p.is_promo = true;
        p.promo_price = Price::from_cents(2500);
        assert_eq!(p.effective_price(), Price::from_cents(2500));
    }

    #[test]
    fn test_discount_percent_rounds() {
        let mut p = product("B1", "Arroz 5kg", "Super B", 3000);
        p.is_promo = true;
        p.promo_price = Price::from_cents(1999);
        assert_eq!(p.discount_percent(), 33);
    }

    #[test]
    fn test_discount_zero_when_not_promo_or_free() {
        let mut p = product("C1", "Sal", "Super C", 0);
        p.is_promo = true;
        assert_eq!(p.discount_ratio(), Decimal::ZERO);

        let q = product("C2", "Sal", "Super C", 300);
        assert_eq!(q.discount_percent(), 0);
    }

    #[test]
    fn test_images_skip_empty() {
        let mut p = product("D1", "Leite", "Super D", 500);
        p.additional_images = vec![String::new(), "b.png".to_owned()];
        assert_eq!(p.images(), vec!["b.png"]);

        p.image_url = "a.png".to_owned();
        assert_eq!(p.images(), vec!["a.png", "b.png"]);
    }

    #[test]
    fn test_deserialize_camel_case_with_defaults() {
        let json = r#"{"id":"A1","name":"Arroz 5kg","category":"Grãos","supermarket":"Super A","normalPrice":30.0}"#;
        let p: Product = serde_json::from_str(json).unwrap();
        assert_eq!(p.normal_price, Price::from_cents(3000));
        assert!(!p.is_promo);
        assert!(p.images().is_empty());
    }
}
