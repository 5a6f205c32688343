//! Domain types for the Shopify Admin discount API.
//!
//! Input types mirror the Admin API's `DiscountCodeAppInput` /
//! `DiscountAutomaticAppInput`; they are serialized as GraphQL variables.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use volume_discount_core::DiscountCombinesWith;

// =============================================================================
// Mutation Results
// =============================================================================

/// A field-level validation error reported by a discount mutation.
///
/// Returned verbatim to the editor; never reclassified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserError {
    /// Machine-readable error code, when Shopify provides one.
    #[serde(default)]
    pub code: Option<String>,
    /// Human-readable message.
    pub message: String,
    /// Path to the offending input field.
    #[serde(default)]
    pub field: Option<Vec<String>>,
}

impl UserError {
    /// Build an error against a field path.
    #[must_use]
    pub fn new(field: &[&str], message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            field: Some(field.iter().map(ToString::to_string).collect()),
        }
    }

    /// The field path joined with dots, empty when there is none.
    #[must_use]
    pub fn field_path(&self) -> String {
        self.field
            .as_ref()
            .map_or_else(String::new, |path| path.join("."))
    }
}

impl std::fmt::Display for UserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.field.as_deref() {
            Some(path) if !path.is_empty() => write!(f, "{} {}", path.join("."), self.message),
            _ => f.write_str(&self.message),
        }
    }
}

/// Result of a create or update round-trip that reached Shopify.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncOutcome {
    /// The app discount's ID, when the mutation returned one.
    pub discount_id: Option<String>,
    /// Field errors, in the order Shopify reported them.
    pub user_errors: Vec<UserError>,
}

impl SyncOutcome {
    /// Whether the mutation was accepted without field errors.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.user_errors.is_empty()
    }
}

// =============================================================================
// Mutation Inputs
// =============================================================================

/// Metafield entry attached to a discount mutation.
///
/// New entries carry `namespace` and `key`; existing entries are addressed by
/// `id` only, since namespace and key cannot change once set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetafieldInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(rename = "type")]
    pub value_type: String,
    pub value: String,
}

impl MetafieldInput {
    /// JSON metafield type.
    pub const JSON: &'static str = "json";

    /// A metafield that does not exist yet.
    #[must_use]
    pub fn create(namespace: &str, key: &str, value: String) -> Self {
        Self {
            id: None,
            namespace: Some(namespace.to_string()),
            key: Some(key.to_string()),
            value_type: Self::JSON.to_string(),
            value,
        }
    }

    /// An update to an existing metafield.
    #[must_use]
    pub fn update(id: &str, value: String) -> Self {
        Self {
            id: Some(id.to_string()),
            namespace: None,
            key: None,
            value_type: Self::JSON.to_string(),
            value,
        }
    }
}

/// Input for `discountCodeAppCreate` / `discountCodeAppUpdate`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountCodeAppInput {
    pub function_id: String,
    pub title: String,
    pub combines_with: DiscountCombinesWith,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub code: String,
    pub usage_limit: Option<i64>,
    pub applies_once_per_customer: bool,
    pub metafields: Vec<MetafieldInput>,
}

/// Input for `discountAutomaticAppCreate` / `discountAutomaticAppUpdate`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountAutomaticAppInput {
    pub function_id: String,
    pub title: String,
    pub combines_with: DiscountCombinesWith,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub metafields: Vec<MetafieldInput>,
}
