//! EcoFeira CLI - compare grocery prices from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Search the catalog, cheapest first
//! ecofeira search arroz --sort price-asc
//!
//! # Compare a product with same-named offers at other stores
//! ecofeira compare A1
//!
//! # Shopping list
//! ecofeira list add A1
//! ecofeira list qty <ITEM_ID> -1
//! ecofeira list optimize
//!
//! # Resolve a scanned barcode
//! ecofeira scan 7891000100103
//! ```
//!
//! # Commands
//!
//! - `search` - Filtered, sorted, paginated product listing
//! - `promos` - Promotions across every store
//! - `compare` - Product detail with price comparison
//! - `stores` / `store` - Store list and store page
//! - `list` - Shopping list management
//! - `fav` - Favorites
//! - `scan` - Scanned code resolution
//! - `history` - Recent searches and scanned codes
//!
//! Configuration is read from the environment (see `ecofeira_storefront::config`).
//! Favorites, the shopping list and histories persist in `ECOFEIRA_DATA_DIR`.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout)]

use clap::{Parser, Subcommand};
use ecofeira_storefront::catalog::CatalogClient;
use ecofeira_storefront::config::StorefrontConfig;
use ecofeira_storefront::state::AppStore;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "ecofeira")]
#[command(author, version, about = "EcoFeira grocery price comparison")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search products
    Search {
        /// Text matched against name, category and store, or an exact product id
        query: Option<String>,

        /// Exact category ("Todas" for all)
        #[arg(short, long)]
        category: Option<String>,

        /// Exact store name ("Todos" for all)
        #[arg(short, long)]
        store: Option<String>,

        /// Only products on promotion
        #[arg(long)]
        promo: bool,

        /// Sort order (`price-asc`, `discount-desc`)
        #[arg(long, default_value = "none")]
        sort: String,

        /// 1-based page
        #[arg(short, long, default_value_t = 1)]
        page: usize,

        /// Show search-box suggestions instead of results
        #[arg(long)]
        suggest: bool,
    },
    /// Products on promotion across every store
    Promos {
        /// 1-based page
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// Compare a product with same-named offers
    Compare {
        /// Product id
        product_id: String,
    },
    /// List stores
    Stores {
        /// Text matched against name, neighborhood and street
        query: Option<String>,
    },
    /// Show one store's products
    Store {
        /// Store id
        store_id: String,

        /// Text matched against product names
        #[arg(short, long)]
        query: Option<String>,

        /// Exact category ("Todas" for all)
        #[arg(short, long)]
        category: Option<String>,

        /// Sort order (`price-asc`, `discount-desc`)
        #[arg(long, default_value = "none")]
        sort: String,

        /// 1-based page
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// Manage the shopping list
    List {
        #[command(subcommand)]
        action: ListAction,
    },
    /// Manage favorites
    Fav {
        #[command(subcommand)]
        action: FavAction,
    },
    /// Resolve a scanned code and search for it
    Scan {
        /// Decoded barcode or QR text
        code: String,
    },
    /// Show recent searches and scanned codes
    History {
        /// Remove one recent search (exact text)
        #[arg(long)]
        remove: Option<String>,
    },
}

#[derive(Subcommand)]
enum ListAction {
    /// Show the list with totals
    Show,
    /// Add one unit of a product
    Add {
        /// Product id
        product_id: String,
    },
    /// Change a line's quantity (never below 1)
    Qty {
        /// List item id
        item_id: String,

        /// Amount to add, negative to subtract
        #[arg(allow_negative_numbers = true)]
        delta: i32,
    },
    /// Remove a line
    Remove {
        /// List item id
        item_id: String,
    },
    /// Toggle a line's checked flag
    Check {
        /// List item id
        item_id: String,
    },
    /// Empty the list
    Clear,
    /// Find the cheapest store for every line
    Optimize,
}

#[derive(Subcommand)]
enum FavAction {
    /// Show favorited products
    Show {
        /// 1-based page
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// Add or remove a favorite
    Toggle {
        /// Product id
        product_id: String,
    },
    /// Remove every favorite
    Clear,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = StorefrontConfig::from_env().expect("Failed to load configuration");

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);

    // Logs go to stderr so command output stays pipeable
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "ecofeira_storefront=warn,ecofeira_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if let Err(e) = run(cli, &config).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &StorefrontConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = AppStore::open(config)?;
    let catalog = CatalogClient::new(&config.catalog).load().await;
    app.finish_loading(catalog);

    match cli.command {
        Commands::Search {
            query,
            category,
            store,
            promo,
            sort,
            page,
            suggest,
        } => {
            let filters = commands::catalog::filters(
                query.unwrap_or_default(),
                category.as_deref(),
                store.as_deref(),
                promo,
                &sort,
            );
            if suggest {
                commands::catalog::suggest(&mut app, filters);
            } else {
                commands::catalog::search(&mut app, filters, page);
            }
        }
        Commands::Promos { page } => commands::catalog::promos(&mut app, page),
        Commands::Compare { product_id } => commands::catalog::compare(&app, &product_id)?,
        Commands::Stores { query } => commands::catalog::stores(&mut app, query.unwrap_or_default()),
        Commands::Store {
            store_id,
            query,
            category,
            sort,
            page,
        } => commands::catalog::store(
            &mut app,
            &store_id,
            commands::catalog::filters(query.unwrap_or_default(), category.as_deref(), None, false, &sort),
            page,
        )?,
        Commands::List { action } => match action {
            ListAction::Show => commands::list::show(&app),
            ListAction::Add { product_id } => commands::list::add(&mut app, &product_id)?,
            ListAction::Qty { item_id, delta } => commands::list::quantity(&mut app, &item_id, delta)?,
            ListAction::Remove { item_id } => commands::list::remove(&mut app, &item_id)?,
            ListAction::Check { item_id } => commands::list::check(&mut app, &item_id)?,
            ListAction::Clear => commands::list::clear(&mut app),
            ListAction::Optimize => commands::list::optimize(&app),
        },
        Commands::Fav { action } => match action {
            FavAction::Show { page } => commands::favorites::show(&mut app, page),
            FavAction::Toggle { product_id } => commands::favorites::toggle(&mut app, &product_id),
            FavAction::Clear => commands::favorites::clear(&mut app),
        },
        Commands::Scan { code } => commands::catalog::scan(&mut app, &code),
        Commands::History { remove } => commands::history::show(&mut app, remove.as_deref()),
    }
    Ok(())
}
