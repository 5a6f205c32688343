//! Volume Discount Core - Shared discount types.
//!
//! This crate provides the domain model of the volume discount app:
//! - the discount function configuration and its field schema
//! - the normalized discount record
//! - classification of Shopify discount subtypes into code/automatic methods
//! - Shopify global ID parsing
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. The Admin API client and the web surface live in the app crate.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
