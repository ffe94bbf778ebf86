//! Favorites commands.

use ecofeira_core::ProductId;
use ecofeira_storefront::routes::Route;
use ecofeira_storefront::state::AppStore;

use super::print_page;

pub fn show(app: &mut AppStore, page: usize) {
    app.navigate(Route::Favorites);
    app.set_page(page);
    print_page(&app.favorites_page());
}

pub fn toggle(app: &mut AppStore, product_id: &str) {
    let id = ProductId::new(product_id);
    if app.toggle_favorite(&id) {
        println!("{product_id} adicionado aos favoritos.");
    } else {
        println!("{product_id} removido dos favoritos.");
    }
}

pub fn clear(app: &mut AppStore) {
    app.clear_favorites();
    println!("Favoritos limpos.");
}
