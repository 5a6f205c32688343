//! Normalized discount record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::configuration::DiscountConfiguration;
use super::method::DiscountMethod;

/// Which other discount classes this discount can combine with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountCombinesWith {
    /// Can combine with order discounts.
    #[serde(default)]
    pub order_discounts: bool,
    /// Can combine with product discounts.
    #[serde(default)]
    pub product_discounts: bool,
    /// Can combine with shipping discounts.
    #[serde(default)]
    pub shipping_discounts: bool,
}

/// A violated record invariant, reported against a form field.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// Code discounts need a code.
    #[error("can't be blank")]
    MissingCode,
    /// The discount would end before it starts.
    #[error("must be after the start date")]
    EndsBeforeStart,
}

impl RecordError {
    /// Field path of the offending value, in submission payload naming.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::MissingCode => "code",
            Self::EndsBeforeStart => "endsAt",
        }
    }
}

/// The in-memory representation of one volume discount.
///
/// `id` is `None` until the discount has been created in Shopify, and
/// `metafield_id` is `None` until its configuration metafield exists. Both are
/// carried outside the JSON payload on submission, so they are skipped when
/// absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    pub method: DiscountMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default)]
    pub combines_with: DiscountCombinesWith,
    #[serde(default)]
    pub usage_limit: Option<i64>,
    #[serde(default)]
    pub applies_once_per_customer: bool,
    pub starts_at: DateTime<Utc>,
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub configuration: DiscountConfiguration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metafield_id: Option<String>,
}

impl DiscountRecord {
    /// A new, not yet created discount starting at `starts_at`.
    #[must_use]
    pub fn new(method: DiscountMethod, starts_at: DateTime<Utc>) -> Self {
        Self {
            id: None,
            title: String::new(),
            method,
            code: None,
            combines_with: DiscountCombinesWith::default(),
            usage_limit: None,
            applies_once_per_customer: false,
            starts_at,
            ends_at: None,
            configuration: DiscountConfiguration::default(),
            metafield_id: None,
        }
    }

    /// Whether the discount still has to be created.
    #[must_use]
    pub const fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// The discount code, if this is a code discount with a non-blank code.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self.method {
            DiscountMethod::Code => self.code.as_deref().filter(|c| !c.trim().is_empty()),
            DiscountMethod::Automatic => None,
        }
    }

    /// Title shown in the Shopify admin.
    ///
    /// Code discounts without their own title are listed under their code.
    #[must_use]
    pub fn display_title(&self) -> &str {
        match (self.method, self.code()) {
            (DiscountMethod::Code, Some(code)) if self.title.trim().is_empty() => code,
            _ => &self.title,
        }
    }

    /// Check the record invariants.
    ///
    /// # Errors
    ///
    /// Returns every violated invariant.
    pub fn validate(&self) -> Result<(), Vec<RecordError>> {
        let mut errors = Vec::new();

        if self.method == DiscountMethod::Code && self.code().is_none() {
            errors.push(RecordError::MissingCode);
        }
        if self.ends_at.is_some_and(|ends_at| ends_at < self.starts_at) {
            errors.push(RecordError::EndsBeforeStart);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
