//! Command implementations.

pub mod catalog;
pub mod favorites;
pub mod history;
pub mod list;

use ecofeira_core::Product;
use ecofeira_storefront::error::AppError;
use ecofeira_storefront::listing::Page;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// No catalog product has this id.
    #[error("No product with id {0}")]
    UnknownProduct(String),

    /// No store has this id.
    #[error("No store with id {0}")]
    UnknownStore(String),

    /// No shopping list line has this id.
    #[error("No shopping list line with id {0}")]
    UnknownItem(String),

    /// Storefront operation failed.
    #[error(transparent)]
    App(#[from] AppError),
}

/// One product per line: id, name, store, price and promo badge.
fn print_product(product: &Product) {
    let badge = if product.is_promo {
        format!(
            "  -{}% (de {})",
            product.discount_percent(),
            product.normal_price.display()
        )
    } else {
        String::new()
    };

    println!(
        "{:<16} {:<40} {:<24} {:>12}{}",
        product.id,
        product.name,
        product.supermarket,
        product.effective_price().display(),
        badge
    );
}

fn print_page(page: &Page<Product>) {
    if page.items.is_empty() {
        println!("Nenhum produto encontrado.");
        return;
    }

    for product in &page.items {
        print_product(product);
    }
    println!(
        "\nPágina {} de {} ({} produtos)",
        page.number,
        page.total_pages.max(1),
        page.total_items
    );
}
