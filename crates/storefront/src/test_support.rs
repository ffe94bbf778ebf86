//! Builders shared by unit tests.

use ecofeira_core::{Price, Product, ProductId, Store, StoreId, StoreStatus};

pub fn product(id: &str, name: &str, category: &str, store: &str, normal_cents: i64) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_owned(),
        category: category.to_owned(),
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

pub fn promo(
    id: &str,
    name: &str,
    category: &str,
    store: &str,
    normal_cents: i64,
    promo_cents: i64,
) -> Product {
    Product {
        is_promo: true,
        promo_price: Price::from_cents(promo_cents),
        ..product(id, name, category, store, normal_cents)
    }
}

pub fn store(id: &str, name: &str, neighborhood: &str) -> Store {
    Store {
        id: StoreId::new(id),
        name: name.to_owned(),
        logo: format!("https://cdn.example.com/{id}.png"),
        street: "Rua Principal".to_owned(),
        neighborhood: neighborhood.to_owned(),
        city: "Recife".to_owned(),
        status: StoreStatus::Open,
        flyer_url: None,
    }
}
