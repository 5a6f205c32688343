//! Discount function configuration and its field schema.
//!
//! The configuration is stored on the discount as a JSON metafield and read by
//! the discount function at checkout. [`DiscountConfiguration::FIELDS`]
//! describes the editable fields so forms can render defaults and parse raw
//! input by kind without knowing the concrete struct.

use core::fmt;

use serde::{Deserialize, Serialize, Serializer};

/// Metafield key the configuration is stored under.
pub const CONFIGURATION_METAFIELD_KEY: &str = "function-configuration";

/// Scalar kind of a configuration field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Whole number.
    Int,
    /// Decimal number.
    Float,
    /// Free text.
    String,
}

/// A parsed configuration field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    Text(String),
}

/// Errors produced while parsing configuration field input.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationFieldError {
    /// The raw text does not parse as the field's kind.
    #[error("must be a whole number")]
    NotAnInteger {
        /// Field name.
        field: &'static str,
    },
    /// The raw text does not parse as a finite number.
    #[error("must be a number")]
    NotANumber {
        /// Field name.
        field: &'static str,
    },
    /// The value parsed but is outside the allowed range.
    #[error("{message}")]
    OutOfRange {
        /// Field name.
        field: &'static str,
        /// Human-readable constraint.
        message: &'static str,
    },
}

impl ConfigurationFieldError {
    /// Name of the field the error refers to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::NotAnInteger { field }
            | Self::NotANumber { field }
            | Self::OutOfRange { field, .. } => field,
        }
    }
}

/// Declaration of one editable configuration field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigurationField {
    /// Key in the configuration JSON.
    pub name: &'static str,
    /// Form label.
    pub label: &'static str,
    /// Default raw value for a new discount.
    pub default: &'static str,
    /// Scalar kind.
    pub kind: FieldKind,
    /// Optional unit suffix shown next to the input.
    pub suffix: Option<&'static str>,
}

impl ConfigurationField {
    /// Parse raw form text according to this field's kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the text does not parse as the declared kind.
    pub fn parse(&self, raw: &str) -> Result<FieldValue, ConfigurationFieldError> {
        let raw = raw.trim();
        match self.kind {
            FieldKind::Int => raw
                .parse::<i64>()
                .map(FieldValue::Int)
                .map_err(|_| ConfigurationFieldError::NotAnInteger { field: self.name }),
            FieldKind::Float => raw
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(FieldValue::Float)
                .ok_or(ConfigurationFieldError::NotANumber { field: self.name }),
            FieldKind::String => Ok(FieldValue::Text(raw.to_owned())),
        }
    }
}

/// Configuration for the volume discount function.
///
/// Serializes as `{"quantity":5,"percentage":10}`. Integral percentages are
/// written without a fractional part; decoding accepts both forms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiscountConfiguration {
    /// Minimum number of items in the cart line for the discount to apply.
    pub quantity: i64,
    /// Percentage off, nominally 0-100.
    #[serde(serialize_with = "serialize_number")]
    pub percentage: f64,
}

impl Default for DiscountConfiguration {
    fn default() -> Self {
        Self {
            quantity: 1,
            percentage: 0.0,
        }
    }
}

impl DiscountConfiguration {
    /// Editable fields, in display order.
    pub const FIELDS: &'static [ConfigurationField] = &[
        ConfigurationField {
            name: "quantity",
            label: "Minimum quantity",
            default: "1",
            kind: FieldKind::Int,
            suffix: None,
        },
        ConfigurationField {
            name: "percentage",
            label: "Discount percentage",
            default: "0",
            kind: FieldKind::Float,
            suffix: Some("%"),
        },
    ];

    /// Current value of a field as form text.
    #[must_use]
    pub fn field_text(&self, name: &str) -> Option<String> {
        match name {
            "quantity" => Some(self.quantity.to_string()),
            "percentage" => Some(format_number(self.percentage)),
            _ => None,
        }
    }

    /// Build a configuration from raw form text.
    ///
    /// `lookup` returns the raw text for a field name; missing fields fall back
    /// to their schema default. All field errors are collected.
    ///
    /// # Errors
    ///
    /// Returns every field that failed to parse or is out of range.
    pub fn from_field_text<'a, F>(lookup: F) -> Result<Self, Vec<ConfigurationFieldError>>
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        let mut config = Self::default();
        let mut errors = Vec::new();

        for field in Self::FIELDS {
            let raw = lookup(field.name).unwrap_or(field.default);
            match (field.name, field.parse(raw)) {
                ("quantity", Ok(FieldValue::Int(quantity))) => {
                    if quantity < 1 {
                        errors.push(ConfigurationFieldError::OutOfRange {
                            field: field.name,
                            message: "must be at least 1",
                        });
                    } else {
                        config.quantity = quantity;
                    }
                }
                ("percentage", Ok(FieldValue::Float(percentage))) => {
                    config.percentage = percentage;
                }
                (_, Err(e)) => errors.push(e),
                _ => {}
            }
        }

        if errors.is_empty() {
            Ok(config)
        } else {
            Err(errors)
        }
    }

    /// Encode as the metafield JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode a metafield JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a configuration object.
    pub fn from_json(value: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(value)
    }
}

impl fmt::Display for DiscountConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}% off {}+ items",
            format_number(self.percentage),
            self.quantity
        )
    }
}

/// Largest magnitude at which every integer is exactly representable in f64.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

fn is_integral(value: f64) -> bool {
    value.is_finite() && value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER
}

/// Format a number the way a JSON client would: `10`, `12.5`.
#[must_use]
pub fn format_number(value: f64) -> String {
    if is_integral(value) {
        #[allow(clippy::cast_possible_truncation)] // bounded by MAX_SAFE_INTEGER
        let whole = value as i64;
        whole.to_string()
    } else {
        value.to_string()
    }
}

fn serialize_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if is_integral(*value) {
        #[allow(clippy::cast_possible_truncation)] // bounded by MAX_SAFE_INTEGER
        let whole = *value as i64;
        serializer.serialize_i64(whole)
    } else if value.is_finite() {
        serializer.serialize_f64(*value)
    } else {
        serializer.serialize_unit()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_json_matches_client_encoding() {
        let config = DiscountConfiguration {
            quantity: 5,
            percentage: 10.0,
        };
        assert_eq!(config.to_json().unwrap(), r#"{"quantity":5,"percentage":10}"#);
    }

    #[test]
    fn test_json_keeps_fractional_percentage() {
        let config = DiscountConfiguration {
            quantity: 3,
            percentage: 12.5,
        };
        assert_eq!(config.to_json().unwrap(), r#"{"quantity":3,"percentage":12.5}"#);
    }

    #[test]
    fn test_json_round_trip() {
        for config in [
            DiscountConfiguration::default(),
            DiscountConfiguration {
                quantity: 12,
                percentage: 33.3,
            },
            DiscountConfiguration {
                quantity: 1,
                percentage: 100.0,
            },
        ] {
            let json = config.to_json().unwrap();
            let decoded = DiscountConfiguration::from_json(&json).unwrap();
            assert_eq!(decoded, config);

            // quantity stays an integer on the wire
            let value: serde_json::Value = serde_json::from_str(&json).unwrap();
            assert!(value["quantity"].is_i64());
        }
    }

    #[test]
    fn test_decode_accepts_float_percentage() {
        let config =
            DiscountConfiguration::from_json(r#"{"quantity":2,"percentage":15.0}"#).unwrap();
        assert!((config.percentage - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_schema_defaults() {
        let config = DiscountConfiguration::from_field_text(|_| None).unwrap();
        assert_eq!(config, DiscountConfiguration::default());
        for field in DiscountConfiguration::FIELDS {
            assert_eq!(
                DiscountConfiguration::default().field_text(field.name).as_deref(),
                Some(field.default)
            );
        }
    }

    #[test]
    fn test_from_field_text() {
        let raw: HashMap<&str, &str> = [("quantity", " 5 "), ("percentage", "7.5")].into();
        let config = DiscountConfiguration::from_field_text(|name| raw.get(name).copied()).unwrap();
        assert_eq!(config.quantity, 5);
        assert!((config.percentage - 7.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_from_field_text_collects_errors() {
        let raw: HashMap<&str, &str> = [("quantity", "two"), ("percentage", "ten")].into();
        let errors =
            DiscountConfiguration::from_field_text(|name| raw.get(name).copied()).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ConfigurationFieldError::NotAnInteger { field: "quantity" },
                ConfigurationFieldError::NotANumber {
                    field: "percentage"
                },
            ]
        );
    }

    #[test]
    fn test_quantity_must_be_positive() {
        let errors = DiscountConfiguration::from_field_text(|name| {
            (name == "quantity").then_some("0")
        })
        .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field(), "quantity");
        assert_eq!(errors[0].to_string(), "must be at least 1");
    }

    #[test]
    fn test_field_kind_parsing() {
        let text = ConfigurationField {
            name: "label",
            label: "Label",
            default: "",
            kind: FieldKind::String,
            suffix: None,
        };
        assert_eq!(
            text.parse("  hello "),
            Ok(FieldValue::Text("hello".to_string()))
        );
        assert!(DiscountConfiguration::FIELDS[1].parse("inf").is_err());
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(10.0), "10");
        assert_eq!(format_number(2.25), "2.25");
    }

    #[test]
    fn test_display() {
        let config = DiscountConfiguration {
            quantity: 4,
            percentage: 15.0,
        };
        assert_eq!(config.to_string(), "15% off 4+ items");
    }
}
