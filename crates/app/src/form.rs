//! Discount editor form state.
//!
//! [`DiscountForm`] holds the editor's field text, moves through
//! `Editing -> Submitting -> (Submitted | Editing with errors)`, and turns its
//! fields into the [`SubmissionPayload`] the action consumes.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use volume_discount_core::{
    DiscountCombinesWith, DiscountConfiguration, DiscountMethod, DiscountRecord,
};

use crate::shopify::UserError;

/// Heading of the error banner.
pub const ERROR_BANNER_HEADING: &str = "There were some issues with your form submission:";

/// Format used for `datetime-local` inputs. Seconds are kept so an
/// unchanged date posts back exactly as it was loaded.
const DATETIME_LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Where the form is in its submit cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Editing,
    Submitting,
    Submitted,
}

/// The raw payload posted to the action.
///
/// `id` is empty for a discount that does not exist yet; `metafieldId` is
/// empty until the configuration metafield has been assigned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    /// JSON-encoded [`DiscountRecord`].
    #[serde(default)]
    pub discount: String,
    #[serde(default)]
    pub id: String,
    #[serde(default, rename = "metafieldId")]
    pub metafield_id: String,
}

/// Fields posted by the editor page.
///
/// Checkboxes are present only when ticked. Configuration inputs are posted
/// under their schema field names and collected in `configuration`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscountFormInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub combines_order: Option<String>,
    #[serde(default)]
    pub combines_product: Option<String>,
    #[serde(default)]
    pub combines_shipping: Option<String>,
    #[serde(default)]
    pub usage_limit: String,
    #[serde(default)]
    pub applies_once_per_customer: Option<String>,
    #[serde(default)]
    pub starts_at: String,
    #[serde(default)]
    pub ends_at: String,
    #[serde(flatten)]
    pub configuration: HashMap<String, String>,
}

/// Error banner content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorBanner {
    pub heading: &'static str,
    pub lines: Vec<String>,
}

/// Editable state of one discount.
#[derive(Debug, Clone)]
pub struct DiscountForm {
    discount_id: Option<String>,
    metafield_id: Option<String>,
    pub title: String,
    pub method: DiscountMethod,
    pub code: String,
    pub combines_with: DiscountCombinesWith,
    pub usage_limit: String,
    pub applies_once_per_customer: bool,
    pub starts_at: String,
    pub ends_at: String,
    configuration: Vec<(&'static str, String)>,
    state: FormState,
    errors: Vec<UserError>,
}

impl DiscountForm {
    /// Defaults for a new code discount starting at `now`.
    #[must_use]
    pub fn blank(now: DateTime<Utc>) -> Self {
        Self {
            discount_id: None,
            metafield_id: None,
            title: String::new(),
            method: DiscountMethod::Code,
            code: String::new(),
            combines_with: DiscountCombinesWith::default(),
            usage_limit: String::new(),
            applies_once_per_customer: false,
            starts_at: format_datetime(now),
            ends_at: String::new(),
            configuration: DiscountConfiguration::FIELDS
                .iter()
                .map(|field| (field.name, field.default.to_string()))
                .collect(),
            state: FormState::Editing,
            errors: Vec::new(),
        }
    }

    /// Bind a loaded discount.
    #[must_use]
    pub fn from_record(record: &DiscountRecord) -> Self {
        Self {
            discount_id: record.id.clone(),
            metafield_id: record.metafield_id.clone(),
            title: record.title.clone(),
            method: record.method,
            code: record.code.clone().unwrap_or_default(),
            combines_with: record.combines_with,
            usage_limit: record
                .usage_limit
                .map(|limit| limit.to_string())
                .unwrap_or_default(),
            applies_once_per_customer: record.applies_once_per_customer,
            starts_at: format_datetime(record.starts_at),
            ends_at: record.ends_at.map(format_datetime).unwrap_or_default(),
            configuration: DiscountConfiguration::FIELDS
                .iter()
                .map(|field| {
                    let text = record
                        .configuration
                        .field_text(field.name)
                        .unwrap_or_else(|| field.default.to_string());
                    (field.name, text)
                })
                .collect(),
            state: FormState::Editing,
            errors: Vec::new(),
        }
    }

    /// Overwrite fields with posted input.
    ///
    /// The method of a discount that already exists cannot change; a posted
    /// method is only honoured for new discounts.
    pub fn apply_input(&mut self, input: DiscountFormInput) {
        self.title = input.title;
        self.code = input.code;
        if self.is_new()
            && let Some(method) = input.method.as_deref().and_then(DiscountMethod::from_str_param)
        {
            self.method = method;
        }
        self.combines_with = DiscountCombinesWith {
            order_discounts: input.combines_order.is_some(),
            product_discounts: input.combines_product.is_some(),
            shipping_discounts: input.combines_shipping.is_some(),
        };
        self.usage_limit = input.usage_limit;
        self.applies_once_per_customer = input.applies_once_per_customer.is_some();
        self.starts_at = input.starts_at;
        self.ends_at = input.ends_at;

        let mut configuration = input.configuration;
        for (name, text) in &mut self.configuration {
            if let Some(posted) = configuration.remove(*name) {
                *text = posted;
            }
        }
    }

    /// Whether the discount still has to be created.
    #[must_use]
    pub const fn is_new(&self) -> bool {
        self.discount_id.is_none()
    }

    /// Whether a submission is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.state, FormState::Submitting)
    }

    /// Whether the last submission succeeded.
    #[must_use]
    pub const fn is_submitted(&self) -> bool {
        matches!(self.state, FormState::Submitted)
    }

    #[must_use]
    pub const fn state(&self) -> FormState {
        self.state
    }

    /// Current text of a configuration field.
    #[must_use]
    pub fn configuration_value(&self, name: &str) -> Option<&str> {
        self.configuration
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, text)| text.as_str())
    }

    /// Serialize the fields for the action.
    ///
    /// On success the form is `Submitting`. If the fields do not make a valid
    /// discount the problems go to the error banner, the form stays
    /// `Editing`, and `None` is returned.
    pub fn submit(&mut self) -> Option<SubmissionPayload> {
        let record = match self.to_record() {
            Ok(record) => record,
            Err(errors) => {
                self.errors = errors;
                self.state = FormState::Editing;
                return None;
            }
        };

        match serde_json::to_string(&record) {
            Ok(discount) => {
                self.errors.clear();
                self.state = FormState::Submitting;
                Some(SubmissionPayload {
                    discount,
                    id: self.discount_id.clone().unwrap_or_default(),
                    metafield_id: self.metafield_id.clone().unwrap_or_default(),
                })
            }
            Err(e) => {
                self.errors = vec![UserError::new(&["discount"], e.to_string())];
                self.state = FormState::Editing;
                None
            }
        }
    }

    /// Record the action's result.
    ///
    /// No errors means the submission is done; otherwise the form goes back to
    /// `Editing` with the errors in the banner and the submitted values kept.
    pub fn complete(&mut self, errors: Vec<UserError>) {
        if errors.is_empty() {
            self.state = FormState::Submitted;
        } else {
            self.state = FormState::Editing;
        }
        self.errors = errors;
    }

    /// The banner for the current errors, `None` when there are none.
    #[must_use]
    pub fn error_banner(&self) -> Option<ErrorBanner> {
        if self.errors.is_empty() {
            return None;
        }
        Some(ErrorBanner {
            heading: ERROR_BANNER_HEADING,
            lines: self.errors.iter().map(ToString::to_string).collect(),
        })
    }

    /// Parse the field text into a record, collecting every field error.
    fn to_record(&self) -> Result<DiscountRecord, Vec<UserError>> {
        let mut errors = Vec::new();

        let starts_at = match parse_datetime(&self.starts_at) {
            Some(starts_at) => Some(starts_at),
            None => {
                errors.push(UserError::new(&["startsAt"], "is not a valid date"));
                None
            }
        };

        let ends_at = if self.ends_at.trim().is_empty() {
            Some(None)
        } else if let Some(ends_at) = parse_datetime(&self.ends_at) {
            Some(Some(ends_at))
        } else {
            errors.push(UserError::new(&["endsAt"], "is not a valid date"));
            None
        };

        let usage_limit = match self.usage_limit.trim() {
            "" => None,
            raw => match raw.parse::<i64>() {
                Ok(limit) if limit >= 1 => Some(limit),
                Ok(_) => {
                    errors.push(UserError::new(&["usageLimit"], "must be at least 1"));
                    None
                }
                Err(_) => {
                    errors.push(UserError::new(&["usageLimit"], "must be a whole number"));
                    None
                }
            },
        };

        let configuration = DiscountConfiguration::from_field_text(|name| {
            self.configuration_value(name)
        })
        .map_err(|field_errors| {
            errors.extend(
                field_errors
                    .iter()
                    .map(|e| UserError::new(&["configuration", e.field()], e.to_string())),
            );
        })
        .ok();

        let code = match self.method {
            DiscountMethod::Code => Some(self.code.trim().to_string()),
            DiscountMethod::Automatic => None,
        };

        let record = DiscountRecord {
            id: None,
            title: self.title.trim().to_string(),
            method: self.method,
            code,
            combines_with: self.combines_with,
            usage_limit: usage_limit.filter(|_| self.method == DiscountMethod::Code),
            applies_once_per_customer: self.method == DiscountMethod::Code
                && self.applies_once_per_customer,
            starts_at: starts_at.unwrap_or_default(),
            ends_at: ends_at.flatten(),
            configuration: configuration.unwrap_or_default(),
            metafield_id: None,
        };

        if let Err(record_errors) = record.validate() {
            errors.extend(
                record_errors
                    .iter()
                    // Date ordering is meaningless when a date failed to parse.
                    .filter(|e| starts_at.is_some() || e.field() != "endsAt")
                    .map(|e| UserError::new(&[e.field()], e.to_string())),
            );
        }

        if errors.is_empty() {
            Ok(record)
        } else {
            Err(errors)
        }
    }
}

/// Format a timestamp for a `datetime-local` input.
#[must_use]
pub fn format_datetime(value: DateTime<Utc>) -> String {
    value.format(DATETIME_LOCAL_FORMAT).to_string()
}

/// Parse a date from RFC 3339, a `datetime-local` value (taken as UTC), or a
/// bare date (midnight UTC).
#[must_use]
pub fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(value) = DateTime::parse_from_rfc3339(raw) {
        return Some(value.with_timezone(&Utc));
    }
    for format in [DATETIME_LOCAL_FORMAT, "%Y-%m-%dT%H:%M"] {
        if let Ok(value) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(value.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|value| value.and_utc())
}
