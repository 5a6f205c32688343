//! Shopify global ID (GID) parsing.

use core::fmt;

/// Errors that can occur when parsing a [`ShopifyGid`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GidError {
    /// The input does not start with `gid://`.
    #[error("global id must start with gid://")]
    MissingScheme,
    /// The input is missing the namespace, resource type, or id segment.
    #[error("global id must have the form gid://<namespace>/<type>/<id>")]
    MissingSegment,
}

/// A parsed Shopify global ID such as `gid://shopify/DiscountCodeNode/123`.
///
/// Query parameters (`?...`) sometimes appended by the Admin API are ignored.
///
/// ```
/// use volume_discount_core::ShopifyGid;
///
/// let gid = ShopifyGid::parse("gid://shopify/DiscountAutomaticApp/123").unwrap();
/// assert_eq!(gid.resource_type(), "DiscountAutomaticApp");
/// assert_eq!(gid.id(), "123");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShopifyGid {
    namespace: String,
    resource_type: String,
    id: String,
}

impl ShopifyGid {
    const SCHEME: &'static str = "gid://";

    /// Parse a global ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the scheme is missing or any of the three path
    /// segments is empty.
    pub fn parse(s: &str) -> Result<Self, GidError> {
        let rest = s.strip_prefix(Self::SCHEME).ok_or(GidError::MissingScheme)?;
        let rest = rest.split('?').next().unwrap_or_default();

        let mut segments = rest.splitn(3, '/');
        let namespace = segments.next().unwrap_or_default();
        let resource_type = segments.next().unwrap_or_default();
        let id = segments.next().unwrap_or_default();

        if namespace.is_empty() || resource_type.is_empty() || id.is_empty() {
            return Err(GidError::MissingSegment);
        }

        Ok(Self {
            namespace: namespace.to_owned(),
            resource_type: resource_type.to_owned(),
            id: id.to_owned(),
        })
    }

    /// Build a `gid://shopify/<resource_type>/<id>` value.
    #[must_use]
    pub fn shopify(resource_type: &str, id: &str) -> Self {
        Self {
            namespace: "shopify".to_owned(),
            resource_type: resource_type.to_owned(),
            id: id.to_owned(),
        }
    }

    /// Namespace segment (normally `shopify`).
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Resource type segment, e.g. `DiscountCodeNode`.
    #[must_use]
    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// Trailing id segment.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for ShopifyGid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}/{}/{}",
            Self::SCHEME,
            self.namespace,
            self.resource_type,
            self.id
        )
    }
}

impl std::str::FromStr for ShopifyGid {
    type Err = GidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Resolve a route identifier into a discount node global ID.
///
/// A bare id is wrapped as `gid://shopify/DiscountNode/<id>`; anything that is
/// already a global ID is returned unchanged.
#[must_use]
pub fn discount_node_gid(id: &str) -> String {
    if id.starts_with(ShopifyGid::SCHEME) {
        id.to_owned()
    } else {
        ShopifyGid::shopify("DiscountNode", id).to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_discount_gid() {
        let gid = ShopifyGid::parse("gid://shopify/DiscountCodeNode/42").unwrap();
        assert_eq!(gid.namespace(), "shopify");
        assert_eq!(gid.resource_type(), "DiscountCodeNode");
        assert_eq!(gid.id(), "42");
        assert_eq!(gid.to_string(), "gid://shopify/DiscountCodeNode/42");
    }

    #[test]
    fn test_parse_ignores_query() {
        let gid = ShopifyGid::parse("gid://shopify/Metafield/7?owner=1").unwrap();
        assert_eq!(gid.id(), "7");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(ShopifyGid::parse("123"), Err(GidError::MissingScheme));
        assert_eq!(
            ShopifyGid::parse("gid://shopify/DiscountNode"),
            Err(GidError::MissingSegment)
        );
        assert_eq!(
            ShopifyGid::parse("gid:///DiscountNode/1"),
            Err(GidError::MissingSegment)
        );
    }

    #[test]
    fn test_discount_node_gid() {
        assert_eq!(discount_node_gid("123"), "gid://shopify/DiscountNode/123");
        assert_eq!(
            discount_node_gid("gid://shopify/DiscountAutomaticNode/5"),
            "gid://shopify/DiscountAutomaticNode/5"
        );
    }
}
