//! Core discount types.
//!
//! Pure data: no I/O, no HTTP clients. Everything here is shared between the
//! app crate and its tests.

pub mod configuration;
pub mod gid;
pub mod method;
pub mod record;

pub use configuration::{
    CONFIGURATION_METAFIELD_KEY, ConfigurationField, ConfigurationFieldError,
    DiscountConfiguration, FieldKind, FieldValue, format_number,
};
pub use gid::{GidError, ShopifyGid, discount_node_gid};
pub use method::{DiscountMethod, DiscountSubtype, classify_gid};
pub use record::{DiscountCombinesWith, DiscountRecord, RecordError};
