//! Discount record conversions.

use volume_discount_core::{
    DiscountConfiguration, DiscountMethod, DiscountRecord, classify_gid,
};

use crate::shopify::AdminShopifyError;
use crate::shopify::admin::queries::DiscountNode;
use crate::shopify::types::{DiscountAutomaticAppInput, DiscountCodeAppInput, MetafieldInput};

/// Build the code-discount mutation input for a record.
///
/// Usage limit and once-per-customer are only carried by code discounts.
#[must_use]
pub fn code_app_input(
    record: &DiscountRecord,
    function_id: &str,
    metafield: MetafieldInput,
) -> DiscountCodeAppInput {
    DiscountCodeAppInput {
        function_id: function_id.to_string(),
        title: record.display_title().to_string(),
        combines_with: record.combines_with,
        starts_at: record.starts_at,
        ends_at: record.ends_at,
        code: record.code.clone().unwrap_or_default(),
        usage_limit: record.usage_limit,
        applies_once_per_customer: record.applies_once_per_customer,
        metafields: vec![metafield],
    }
}

/// Build the automatic-discount mutation input for a record.
#[must_use]
pub fn automatic_app_input(
    record: &DiscountRecord,
    function_id: &str,
    metafield: MetafieldInput,
) -> DiscountAutomaticAppInput {
    DiscountAutomaticAppInput {
        function_id: function_id.to_string(),
        title: record.title.clone(),
        combines_with: record.combines_with,
        starts_at: record.starts_at,
        ends_at: record.ends_at,
        metafields: vec![metafield],
    }
}

/// Convert a fetched discount node into a record.
///
/// The method comes from the requested global ID when it names a subtype,
/// otherwise from the node's own ID. A node matching neither is an
/// [`AdminShopifyError::UnknownDiscountType`].
///
/// # Errors
///
/// Fails on an unknown subtype, a node without a start date, or a metafield
/// value that is not a configuration object.
pub fn convert_discount_node(
    node: DiscountNode,
    requested_id: &str,
) -> Result<DiscountRecord, AdminShopifyError> {
    let method = classify_gid(requested_id)
        .or_else(|| classify_gid(&node.id))
        .ok_or_else(|| AdminShopifyError::UnknownDiscountType(node.id.clone()))?;

    let discount = node.discount.unwrap_or_default();
    let starts_at = discount.starts_at.ok_or_else(|| {
        AdminShopifyError::UnexpectedResponse(format!("discount {} has no start date", node.id))
    })?;

    let (configuration, metafield_id) = match node.metafield {
        Some(metafield) => (
            DiscountConfiguration::from_json(&metafield.value)?,
            Some(metafield.id),
        ),
        None => (DiscountConfiguration::default(), None),
    };

    let code = match method {
        DiscountMethod::Code => discount
            .codes
            .and_then(|codes| codes.edges.into_iter().next())
            .map(|edge| edge.node.code),
        DiscountMethod::Automatic => None,
    };

    Ok(DiscountRecord {
        id: Some(node.id),
        title: discount.title.unwrap_or_default(),
        method,
        code,
        combines_with: discount.combines_with.unwrap_or_default(),
        usage_limit: discount.usage_limit,
        applies_once_per_customer: discount.applies_once_per_customer.unwrap_or(false),
        starts_at,
        ends_at: discount.ends_at,
        configuration,
        metafield_id,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::shopify::admin::queries::DiscountNodeData;

    fn node(json: &str) -> DiscountNode {
        serde_json::from_str::<DiscountNodeData>(json)
            .unwrap()
            .discount_node
            .unwrap()
    }

    #[test]
    fn test_code_node_conversion() {
        let node = node(
            r#"{"discountNode":{
                "id":"gid://shopify/DiscountCodeNode/9",
                "metafield":{"id":"gid://shopify/Metafield/3","value":"{\"quantity\":5,\"percentage\":10}"},
                "discount":{
                    "title":"Spring",
                    "startsAt":"2026-03-01T00:00:00Z",
                    "endsAt":null,
                    "usageLimit":100,
                    "appliesOncePerCustomer":true,
                    "codes":{"edges":[{"node":{"code":"SPRING"}},{"node":{"code":"OTHER"}}]},
                    "combinesWith":{"orderDiscounts":false,"productDiscounts":true,"shippingDiscounts":false}
                }
            }}"#,
        );

        let record = convert_discount_node(node, "9").unwrap();
        assert_eq!(record.method, DiscountMethod::Code);
        assert_eq!(record.id.as_deref(), Some("gid://shopify/DiscountCodeNode/9"));
        assert_eq!(record.code.as_deref(), Some("SPRING"));
        assert_eq!(record.usage_limit, Some(100));
        assert!(record.applies_once_per_customer);
        assert!(record.combines_with.product_discounts);
        assert_eq!(record.configuration.quantity, 5);
        assert_eq!(record.metafield_id.as_deref(), Some("gid://shopify/Metafield/3"));
        assert_eq!(
            record.starts_at,
            Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_requested_gid_decides_method() {
        let node = node(
            r#"{"discountNode":{
                "id":"gid://shopify/DiscountAutomaticApp/123",
                "metafield":null,
                "discount":{"title":"Bulk","startsAt":"2026-03-01T00:00:00Z","endsAt":null,
                    "combinesWith":{"orderDiscounts":false,"productDiscounts":false,"shippingDiscounts":false}}
            }}"#,
        );

        let record =
            convert_discount_node(node, "gid://shopify/DiscountAutomaticApp/123").unwrap();
        assert_eq!(record.method, DiscountMethod::Automatic);
        assert_eq!(record.code, None);
        assert_eq!(record.configuration, DiscountConfiguration::default());
        assert_eq!(record.metafield_id, None);
    }

    #[test]
    fn test_unknown_subtype_is_an_error() {
        let node = node(
            r#"{"discountNode":{"id":"gid://shopify/DiscountNode/5","metafield":null,"discount":{}}}"#,
        );
        let err = convert_discount_node(node, "5").unwrap_err();
        assert!(matches!(err, AdminShopifyError::UnknownDiscountType(id) if id.ends_with("/5")));
    }

    #[test]
    fn test_code_input_carries_code_fields() {
        let mut record = DiscountRecord::new(
            DiscountMethod::Code,
            Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        );
        record.code = Some("SAVE10".to_string());
        record.usage_limit = Some(5);

        let metafield = MetafieldInput::update("gid://shopify/Metafield/1", "{}".to_string());
        let input = code_app_input(&record, "fn-1", metafield.clone());
        assert_eq!(input.title, "SAVE10");
        assert_eq!(input.code, "SAVE10");
        assert_eq!(input.usage_limit, Some(5));
        assert_eq!(input.metafields, vec![metafield]);

        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(value["functionId"], "fn-1");
        assert_eq!(value["startsAt"], "2026-01-01T00:00:00Z");
    }

    #[test]
    fn test_automatic_input_omits_code_fields() {
        let mut record = DiscountRecord::new(
            DiscountMethod::Automatic,
            Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        );
        record.title = "Bulk".to_string();
        record.usage_limit = Some(5);

        let input = automatic_app_input(
            &record,
            "fn-1",
            MetafieldInput::create("ns", "function-configuration", "{}".to_string()),
        );
        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(value["title"], "Bulk");
        assert!(value.get("code").is_none());
        assert!(value.get("usageLimit").is_none());
        assert!(value.get("appliesOncePerCustomer").is_none());
    }
}
