//! Core types for EcoFeira.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod banner;
pub mod id;
pub mod list;
pub mod price;
pub mod product;
pub mod status;
pub mod store;
pub mod user;

pub use banner::Banner;
pub use id::*;
pub use list::ShoppingListItem;
pub use price::{Price, PriceError};
pub use product::Product;
pub use status::StoreStatus;
pub use store::Store;
pub use user::UserProfile;
