//! Shopper-side services over the catalog and persisted state.
//!
//! # Services
//!
//! - `favorites` - Favorited product ids
//! - `history` - Recent searches and scanned codes
//! - `shopping_list` - Name-grouped shopping list
//! - `optimizer` - Cheapest-offer suggestions for the shopping list
//! - `scan` - Scanned code resolution and the transient error notice
//! - `auth` - Identity provider seam

pub mod auth;
pub mod favorites;
pub mod history;
pub mod optimizer;
pub mod scan;
pub mod shopping_list;

pub use auth::{AuthError, IdentityProvider, LocalIdentity};
pub use favorites::Favorites;
pub use history::{MAX_RECENT_SEARCHES, MAX_SCANNED_CODES, RecentHistory};
pub use optimizer::{CheapestOfferOptimizer, ListOptimizer, OptimizedEntry, OptimizedList};
pub use scan::{SCAN_NOTICE_TTL, ScanNotice, ScanResolution, UNMATCHED_SCAN_MESSAGE, resolve_scan};
pub use shopping_list::ShoppingList;
