//! Volume discount app library.
//!
//! Serves the editor for a Shopify volume discount function: a page that
//! creates or edits an app discount and stores its configuration (minimum
//! quantity and percentage off) as a JSON metafield on the discount.
//!
//! The crate is a library so the router can be driven directly from tests.
//!
//! # Security
//!
//! The app holds an Admin API access token with write access to the store's
//! discounts. It performs no authentication of its own; deploy it behind the
//! embedded app proxy or a private network.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod form;
pub mod routes;
pub mod services;
pub mod shopify;
pub mod state;
