//! Discount method classification.
//!
//! Shopify models discounts as a union of concrete subtypes. For the purposes
//! of this app every subtype is either code-based or automatic, and the
//! mapping is a total function over the closed [`DiscountSubtype`] enum.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::gid::ShopifyGid;

/// How a discount is applied at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DiscountMethod {
    /// Customer enters a code at checkout.
    #[default]
    Code,
    /// Applied automatically when the cart qualifies.
    Automatic,
}

impl DiscountMethod {
    /// Form value for this method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Code => "Code",
            Self::Automatic => "Automatic",
        }
    }

    /// Parse a form value (case-insensitive).
    #[must_use]
    pub fn from_str_param(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "code" => Some(Self::Code),
            "automatic" => Some(Self::Automatic),
            _ => None,
        }
    }
}

impl fmt::Display for DiscountMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Concrete discount subtypes known to the Admin API, plus the two node-level
/// aliases that appear in discount node global IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiscountSubtype {
    CodeApp,
    CodeBasic,
    CodeBxgy,
    CodeFreeShipping,
    CodeNode,
    AutomaticApp,
    AutomaticBasic,
    AutomaticBxgy,
    AutomaticFreeShipping,
    AutomaticNode,
}

impl DiscountSubtype {
    /// The eight concrete subtypes, code variants first.
    pub const CONCRETE: [Self; 8] = [
        Self::CodeApp,
        Self::CodeBasic,
        Self::CodeBxgy,
        Self::CodeFreeShipping,
        Self::AutomaticApp,
        Self::AutomaticBasic,
        Self::AutomaticBxgy,
        Self::AutomaticFreeShipping,
    ];

    /// GraphQL `__typename` of this subtype.
    #[must_use]
    pub const fn typename(self) -> &'static str {
        match self {
            Self::CodeApp => "DiscountCodeApp",
            Self::CodeBasic => "DiscountCodeBasic",
            Self::CodeBxgy => "DiscountCodeBxgy",
            Self::CodeFreeShipping => "DiscountCodeFreeShipping",
            Self::CodeNode => "DiscountCodeNode",
            Self::AutomaticApp => "DiscountAutomaticApp",
            Self::AutomaticBasic => "DiscountAutomaticBasic",
            Self::AutomaticBxgy => "DiscountAutomaticBxgy",
            Self::AutomaticFreeShipping => "DiscountAutomaticFreeShipping",
            Self::AutomaticNode => "DiscountAutomaticNode",
        }
    }

    /// Look up a subtype by its GraphQL type name.
    ///
    /// Returns `None` for names outside the known set; callers must treat that
    /// as a classification failure rather than picking a default.
    #[must_use]
    pub fn from_typename(name: &str) -> Option<Self> {
        match name {
            "DiscountCodeApp" => Some(Self::CodeApp),
            "DiscountCodeBasic" => Some(Self::CodeBasic),
            "DiscountCodeBxgy" => Some(Self::CodeBxgy),
            "DiscountCodeFreeShipping" => Some(Self::CodeFreeShipping),
            "DiscountCodeNode" => Some(Self::CodeNode),
            "DiscountAutomaticApp" => Some(Self::AutomaticApp),
            "DiscountAutomaticBasic" => Some(Self::AutomaticBasic),
            "DiscountAutomaticBxgy" => Some(Self::AutomaticBxgy),
            "DiscountAutomaticFreeShipping" => Some(Self::AutomaticFreeShipping),
            "DiscountAutomaticNode" => Some(Self::AutomaticNode),
            _ => None,
        }
    }

    /// The method this subtype belongs to.
    #[must_use]
    pub const fn method(self) -> DiscountMethod {
        match self {
            Self::CodeApp
            | Self::CodeBasic
            | Self::CodeBxgy
            | Self::CodeFreeShipping
            | Self::CodeNode => DiscountMethod::Code,
            Self::AutomaticApp
            | Self::AutomaticBasic
            | Self::AutomaticBxgy
            | Self::AutomaticFreeShipping
            | Self::AutomaticNode => DiscountMethod::Automatic,
        }
    }
}

impl fmt::Display for DiscountSubtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.typename())
    }
}

/// Classify a discount by the resource-type segment of its global ID.
///
/// `gid://shopify/DiscountAutomaticApp/123` classifies as
/// [`DiscountMethod::Automatic`]. Returns `None` if the ID is malformed or the
/// resource type is not a known discount subtype.
#[must_use]
pub fn classify_gid(gid: &str) -> Option<DiscountMethod> {
    let parsed = ShopifyGid::parse(gid).ok()?;
    DiscountSubtype::from_typename(parsed.resource_type()).map(DiscountSubtype::method)
}
