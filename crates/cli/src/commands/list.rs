//! Shopping list commands.

use ecofeira_core::{ListItemId, ProductId};
use ecofeira_storefront::services::CheapestOfferOptimizer;
use ecofeira_storefront::state::AppStore;

use super::CommandError;

pub fn show(app: &AppStore) {
    let list = app.shopping_list();
    if list.is_empty() {
        println!("Sua lista está vazia.");
        return;
    }

    for item in list.items() {
        let mark = if item.checked { "[x]" } else { "[ ]" };
        println!(
            "{} {:<38} {:>3} x {:>12}  {:<24} {}",
            mark,
            item.product_name,
            item.quantity,
            item.original_price.display(),
            item.original_store,
            item.id
        );
    }
    println!(
        "\n{} itens, {} marcados. Total: {}",
        list.len(),
        list.checked_count(),
        list.total().display()
    );
}

pub fn add(app: &mut AppStore, product_id: &str) -> Result<(), CommandError> {
    let id = app.add_to_list(&ProductId::new(product_id))?;
    if let Some(item) = app.shopping_list().get(&id) {
        println!("{} ({}x) - {}", item.product_name, item.quantity, item.id);
    }
    Ok(())
}

pub fn quantity(app: &mut AppStore, item_id: &str, delta: i32) -> Result<(), CommandError> {
    let id = ListItemId::new(item_id);
    if !app.update_quantity(&id, delta) {
        return Err(CommandError::UnknownItem(item_id.to_owned()));
    }
    if let Some(item) = app.shopping_list().get(&id) {
        println!("{}: {}", item.product_name, item.quantity);
    }
    Ok(())
}

pub fn remove(app: &mut AppStore, item_id: &str) -> Result<(), CommandError> {
    if !app.remove_from_list(&ListItemId::new(item_id)) {
        return Err(CommandError::UnknownItem(item_id.to_owned()));
    }
    println!("Removido.");
    Ok(())
}

pub fn check(app: &mut AppStore, item_id: &str) -> Result<(), CommandError> {
    let checked = app
        .toggle_checked(&ListItemId::new(item_id))
        .ok_or_else(|| CommandError::UnknownItem(item_id.to_owned()))?;
    println!("{}", if checked { "Marcado." } else { "Desmarcado." });
    Ok(())
}

pub fn clear(app: &mut AppStore) {
    app.clear_list();
    println!("Lista limpa.");
}

/// Cheapest store for every line and the total saving.
pub fn optimize(app: &AppStore) {
    let result = app.optimize_list(&CheapestOfferOptimizer);
    if result.entries.is_empty() {
        println!("Sua lista está vazia.");
        return;
    }

    for entry in &result.entries {
        let store = entry
            .best_offer
            .as_ref()
            .map_or(entry.item.original_store.as_str(), |p| p.supermarket.as_str());
        println!(
            "{:<38} {:>3} x {:>12}  {}",
            entry.item.product_name,
            entry.item.quantity,
            entry.unit_price.display(),
            store
        );
    }
    println!(
        "\nTotal atual: {}  Otimizado: {}  Economia: {}",
        result.original_total.display(),
        result.optimized_total.display(),
        result.saving.display()
    );
}
