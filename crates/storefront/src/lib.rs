//! EcoFeira storefront library.
//!
//! Everything behind the shopper-facing views: the catalog client, the
//! listing pipeline, price comparison, local persistence, the shopping list,
//! scan resolution and the backup partner handshake. Rendering lives
//! elsewhere; views drive an [`state::AppStore`] and re-read it on change.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backup;
pub mod catalog;
pub mod compare;
pub mod config;
pub mod error;
pub mod listing;
pub mod persistence;
pub mod routes;
pub mod services;
pub mod state;

#[cfg(test)]
mod test_support;
