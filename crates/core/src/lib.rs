//! EcoFeira Core - Shared types library.
//!
//! This crate provides common types used across all EcoFeira components:
//! - `storefront` - Catalog, listing pipeline, persistence and backup bridge
//! - `cli` - Command-line front end over the storefront library
//!
//! # Architecture
//!
//! The core crate contains only types and pure helpers - no I/O, no storage
//! access, no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs and prices, plus the catalog and list records
//! - [`text`] - Accent-insensitive normalization and URL slugs

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod text;
pub mod types;

pub use types::*;
