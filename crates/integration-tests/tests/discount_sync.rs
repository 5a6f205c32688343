//! Integration tests for the discount sync adapter against a fake Admin API.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use chrono::{TimeZone, Utc};
use serde_json::json;
use volume_discount_app::shopify::{AdminShopifyError, UserError};
use volume_discount_core::{DiscountConfiguration, DiscountMethod, DiscountRecord};
use volume_discount_integration_tests::{
    FakeShopify, TEST_ACCESS_TOKEN, automatic_discount_node, code_discount_node,
    create_response, update_response,
};

const NAMESPACE: &str = "$app:volume-discount";
const FUNCTION_ID: &str = "0199b8d2-volume-fn";

fn code_record() -> DiscountRecord {
    let mut record = DiscountRecord::new(
        DiscountMethod::Code,
        Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap(),
    );
    record.code = Some("SAVE10".to_string());
    record.usage_limit = Some(100);
    record.applies_once_per_customer = true;
    record.configuration = DiscountConfiguration {
        quantity: 5,
        percentage: 10.0,
    };
    record
}

fn automatic_record() -> DiscountRecord {
    let mut record = DiscountRecord::new(
        DiscountMethod::Automatic,
        Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap(),
    );
    record.title = "Buy more, save more".to_string();
    record.usage_limit = Some(100);
    record
}

// ============================================================================
// Create
// ============================================================================

#[tokio::test]
async fn test_create_code_discount() {
    let shopify = FakeShopify::start().await;
    shopify.respond(&create_response(
        "codeAppDiscount",
        "gid://shopify/DiscountCodeApp/1",
        &json!([]),
    ));

    let outcome = shopify
        .client()
        .create_discount(&code_record(), FUNCTION_ID, NAMESPACE)
        .await
        .unwrap();

    assert!(outcome.is_success());
    assert_eq!(
        outcome.discount_id.as_deref(),
        Some("gid://shopify/DiscountCodeApp/1")
    );

    let requests = shopify.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.access_token.as_deref(), Some(TEST_ACCESS_TOKEN));
    assert!(request.query().contains("discountCodeAppCreate"));
    assert_eq!(request.body["operationName"], "CreateCodeAppDiscount");

    let discount = request.discount();
    assert_eq!(discount["code"], "SAVE10");
    assert_eq!(discount["title"], "SAVE10");
    assert_eq!(discount["functionId"], FUNCTION_ID);
    assert_eq!(discount["usageLimit"], 100);
    assert_eq!(discount["appliesOncePerCustomer"], true);
    assert_eq!(discount["startsAt"], "2026-03-01T00:00:00Z");

    let metafield = request.metafield();
    assert_eq!(metafield["namespace"], NAMESPACE);
    assert_eq!(metafield["key"], "function-configuration");
    assert_eq!(metafield["type"], "json");
    assert_eq!(metafield["value"], r#"{"quantity":5,"percentage":10}"#);
}

#[tokio::test]
async fn test_create_automatic_discount_omits_code_fields() {
    let shopify = FakeShopify::start().await;
    shopify.respond(&create_response(
        "automaticAppDiscount",
        "gid://shopify/DiscountAutomaticApp/2",
        &json!([]),
    ));

    let outcome = shopify
        .client()
        .create_discount(&automatic_record(), FUNCTION_ID, NAMESPACE)
        .await
        .unwrap();
    assert_eq!(
        outcome.discount_id.as_deref(),
        Some("gid://shopify/DiscountAutomaticApp/2")
    );

    let request = &shopify.requests()[0];
    assert!(request.query().contains("discountAutomaticAppCreate"));
    let discount = request.discount();
    assert_eq!(discount["title"], "Buy more, save more");
    assert!(discount.get("code").is_none());
    assert!(discount.get("usageLimit").is_none());
    assert!(discount.get("appliesOncePerCustomer").is_none());
}

#[tokio::test]
async fn test_user_errors_returned_in_order() {
    let shopify = FakeShopify::start().await;
    shopify.respond(&json!({
        "data": {
            "discountCreate": {
                "codeAppDiscount": null,
                "userErrors": [
                    { "code": "TOO_SHORT", "message": "too short", "field": ["codeAppDiscount", "title"] },
                    { "code": "TAKEN", "message": "is already taken", "field": ["codeAppDiscount", "code"] },
                    { "code": null, "message": "Function not found", "field": null }
                ]
            }
        }
    }));

    let outcome = shopify
        .client()
        .create_discount(&code_record(), FUNCTION_ID, NAMESPACE)
        .await
        .unwrap();

    assert_eq!(outcome.discount_id, None);
    assert_eq!(
        outcome.user_errors,
        vec![
            UserError {
                code: Some("TOO_SHORT".to_string()),
                message: "too short".to_string(),
                field: Some(vec!["codeAppDiscount".to_string(), "title".to_string()]),
            },
            UserError {
                code: Some("TAKEN".to_string()),
                message: "is already taken".to_string(),
                field: Some(vec!["codeAppDiscount".to_string(), "code".to_string()]),
            },
            UserError {
                code: None,
                message: "Function not found".to_string(),
                field: None,
            },
        ]
    );
}

// ============================================================================
// Update
// ============================================================================

#[tokio::test]
async fn test_create_then_update_reuses_metafield() {
    let shopify = FakeShopify::start().await;
    shopify.respond(&create_response(
        "codeAppDiscount",
        "gid://shopify/DiscountCodeApp/1",
        &json!([]),
    ));
    shopify.respond(&update_response(
        "codeAppDiscount",
        "gid://shopify/DiscountCodeApp/1",
        &json!([]),
    ));

    let client = shopify.client();
    let mut record = code_record();
    let created = client
        .create_discount(&record, FUNCTION_ID, NAMESPACE)
        .await
        .unwrap();

    record.configuration.percentage = 15.0;
    let updated = client
        .update_discount(
            &record,
            created.discount_id.as_deref().unwrap(),
            FUNCTION_ID,
            NAMESPACE,
            Some("gid://shopify/Metafield/9"),
        )
        .await
        .unwrap();
    assert!(updated.is_success());

    let requests = shopify.requests();
    assert_eq!(requests.len(), 2);
    let update = &requests[1];
    assert!(update.query().contains("discountCodeAppUpdate"));
    assert_eq!(
        update.body["variables"]["id"],
        "gid://shopify/DiscountCodeApp/1"
    );

    let metafield = update.metafield();
    assert_eq!(metafield["id"], "gid://shopify/Metafield/9");
    assert!(metafield.get("namespace").is_none());
    assert!(metafield.get("key").is_none());
    assert_eq!(metafield["value"], r#"{"quantity":5,"percentage":15}"#);
}

#[tokio::test]
async fn test_update_without_metafield_assigns_one() {
    let shopify = FakeShopify::start().await;
    shopify.respond(&update_response(
        "automaticAppDiscount",
        "gid://shopify/DiscountAutomaticApp/2",
        &json!([]),
    ));

    shopify
        .client()
        .update_discount(
            &automatic_record(),
            "gid://shopify/DiscountAutomaticNode/2",
            FUNCTION_ID,
            NAMESPACE,
            None,
        )
        .await
        .unwrap();

    let request = &shopify.requests()[0];
    assert!(request.query().contains("discountAutomaticAppUpdate"));
    let metafield = request.metafield();
    assert!(metafield.get("id").is_none());
    assert_eq!(metafield["namespace"], NAMESPACE);
    assert_eq!(metafield["key"], "function-configuration");
}

#[tokio::test]
async fn test_update_user_errors_are_surfaced() {
    let shopify = FakeShopify::start().await;
    shopify.respond(&json!({
        "data": {
            "discountUpdate": {
                "codeAppDiscount": null,
                "userErrors": [{ "code": "INVALID", "message": "must be after the start date", "field": ["codeAppDiscount", "endsAt"] }]
            }
        }
    }));

    let outcome = shopify
        .client()
        .update_discount(&code_record(), "gid://shopify/DiscountCodeNode/1", FUNCTION_ID, NAMESPACE, None)
        .await
        .unwrap();
    assert_eq!(outcome.user_errors.len(), 1);
    assert_eq!(
        outcome.user_errors[0].to_string(),
        "codeAppDiscount.endsAt must be after the start date"
    );
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_missing_payload_is_not_success() {
    let shopify = FakeShopify::start().await;
    shopify.respond(&json!({ "data": { "discountCreate": null } }));

    let err = shopify
        .client()
        .create_discount(&code_record(), FUNCTION_ID, NAMESPACE)
        .await
        .unwrap_err();
    assert!(matches!(err, AdminShopifyError::UnexpectedResponse(_)));
}

#[tokio::test]
async fn test_malformed_body_is_an_error() {
    let shopify = FakeShopify::start().await;
    shopify.respond_raw(StatusCode::OK, "<html>maintenance</html>");

    let err = shopify
        .client()
        .create_discount(&code_record(), FUNCTION_ID, NAMESPACE)
        .await
        .unwrap_err();
    assert!(matches!(err, AdminShopifyError::Parse(_)));
}

#[tokio::test]
async fn test_non_success_status_is_an_error() {
    let shopify = FakeShopify::start().await;
    shopify.respond_raw(StatusCode::SERVICE_UNAVAILABLE, "down");

    let err = shopify
        .client()
        .update_discount(&code_record(), "gid://shopify/DiscountCodeNode/1", FUNCTION_ID, NAMESPACE, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AdminShopifyError::Status(503, ref body) if body == "down"));
}

#[tokio::test]
async fn test_rate_limit_and_unauthorized() {
    let shopify = FakeShopify::start().await;
    shopify.respond_raw(StatusCode::TOO_MANY_REQUESTS, "{}");
    shopify.respond_raw(StatusCode::UNAUTHORIZED, "{}");
    let client = shopify.client();

    let err = client
        .create_discount(&code_record(), FUNCTION_ID, NAMESPACE)
        .await
        .unwrap_err();
    assert!(matches!(err, AdminShopifyError::RateLimited(60)));

    let err = client
        .create_discount(&code_record(), FUNCTION_ID, NAMESPACE)
        .await
        .unwrap_err();
    assert!(matches!(err, AdminShopifyError::Unauthorized(_)));
}

#[tokio::test]
async fn test_graphql_errors_are_an_error() {
    let shopify = FakeShopify::start().await;
    shopify.respond(&json!({
        "errors": [{ "message": "Field 'discountCodeAppCreate' doesn't exist", "locations": [{ "line": 2, "column": 3 }] }]
    }));

    let err = shopify
        .client()
        .create_discount(&code_record(), FUNCTION_ID, NAMESPACE)
        .await
        .unwrap_err();
    match err {
        AdminShopifyError::GraphQL(errors) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].locations[0].line, 2);
        }
        other => panic!("expected GraphQL error, got {other:?}"),
    }
}

// ============================================================================
// Read
// ============================================================================

#[tokio::test]
async fn test_get_code_discount() {
    let shopify = FakeShopify::start().await;
    shopify.respond(&code_discount_node(
        "gid://shopify/DiscountCodeNode/41",
        "SAVE10",
        Some(("gid://shopify/Metafield/9", r#"{"quantity":5,"percentage":10}"#)),
    ));

    let record = shopify
        .client()
        .get_discount("41", NAMESPACE, "function-configuration")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(record.method, DiscountMethod::Code);
    assert_eq!(record.code.as_deref(), Some("SAVE10"));
    assert_eq!(record.usage_limit, Some(25));
    assert_eq!(record.metafield_id.as_deref(), Some("gid://shopify/Metafield/9"));
    assert_eq!(record.configuration.quantity, 5);

    let request = &shopify.requests()[0];
    let query = request.query();
    assert!(query.contains(r#"discountNode(id: "gid://shopify/DiscountNode/41")"#));
    assert!(query.contains(r#"metafield(namespace: "$app:volume-discount", key: "function-configuration")"#));
}

#[tokio::test]
async fn test_get_automatic_discount_by_subtype_gid() {
    let shopify = FakeShopify::start().await;
    shopify.respond(&automatic_discount_node(
        "gid://shopify/DiscountAutomaticApp/123",
        "Bulk",
    ));

    let record = shopify
        .client()
        .get_discount(
            "gid://shopify/DiscountAutomaticApp/123",
            NAMESPACE,
            "function-configuration",
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(record.method, DiscountMethod::Automatic);
    assert_eq!(record.code, None);
    assert_eq!(record.title, "Bulk");
    assert!((record.configuration.percentage - 12.5).abs() < f64::EPSILON);
    assert!(record.ends_at.is_some());
}

#[tokio::test]
async fn test_get_missing_discount() {
    let shopify = FakeShopify::start().await;
    shopify.respond(&json!({ "data": { "discountNode": null } }));

    let record = shopify
        .client()
        .get_discount("404", NAMESPACE, "function-configuration")
        .await
        .unwrap();
    assert!(record.is_none());
}

#[tokio::test]
async fn test_get_unknown_subtype_fails() {
    let shopify = FakeShopify::start().await;
    shopify.respond(&json!({
        "data": {
            "discountNode": {
                "id": "gid://shopify/DiscountNode/7",
                "metafield": null,
                "discount": {}
            }
        }
    }));

    let err = shopify
        .client()
        .get_discount("7", NAMESPACE, "function-configuration")
        .await
        .unwrap_err();
    assert!(matches!(err, AdminShopifyError::UnknownDiscountType(_)));
}
