//! Search and scan history.

use ecofeira_storefront::state::AppStore;

/// Print both histories, after removing one recent search if asked.
pub fn show(app: &mut AppStore, remove: Option<&str>) {
    if let Some(term) = remove {
        app.remove_recent_search(term);
    }

    println!("Buscas recentes:");
    for term in app.recent_searches() {
        println!("  {term}");
    }

    println!("Códigos escaneados:");
    for code in app.scanned_history() {
        println!("  {code}");
    }

    let popular = &app.catalog().popular_suggestions;
    if !popular.is_empty() {
        println!("Buscas populares: {}", popular.join(", "));
    }
}
