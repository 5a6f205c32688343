//! Business logic services.
//!
//! # Services
//!
//! - `volume_discount` - Loader and action for the volume discount editor

pub mod volume_discount;

pub use volume_discount::{load, save};
