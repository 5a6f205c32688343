//! Conversions between discount records and Admin API shapes.
//!
//! Outbound: [`DiscountRecord`](volume_discount_core::DiscountRecord) into
//! mutation inputs. Inbound: the discount read query's node into a record.

mod discounts;

pub use discounts::{automatic_app_input, code_app_input, convert_discount_node};
