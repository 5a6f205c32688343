//! Integration tests for the volume discount app.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p volume-discount-integration-tests
//! ```
//!
//! No Shopify store is needed: [`FakeShopify`] serves the Admin GraphQL
//! endpoint on an ephemeral port, replays queued responses, and records every
//! request body it receives.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::missing_panics_doc)]

use std::collections::VecDeque;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
};
use secrecy::SecretString;
use serde_json::{Value, json};
use volume_discount_app::config::{AppConfig, DiscountConfig, ShopifyAdminConfig};
use volume_discount_app::shopify::AdminClient;
use volume_discount_app::state::AppState;

/// Access token the fake expects.
pub const TEST_ACCESS_TOKEN: &str = "shpat_4f9c2e7a1b8d3065";

/// Store domain used in test configuration.
pub const TEST_STORE: &str = "volume-test.myshopify.com";

/// A request received by the fake.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub access_token: Option<String>,
    pub body: Value,
}

impl RecordedRequest {
    /// The GraphQL document.
    #[must_use]
    pub fn query(&self) -> &str {
        self.body["query"].as_str().unwrap_or_default()
    }

    /// The `discount` variable of a mutation.
    #[must_use]
    pub fn discount(&self) -> &Value {
        &self.body["variables"]["discount"]
    }

    /// The single metafield entry of a mutation.
    #[must_use]
    pub fn metafield(&self) -> &Value {
        &self.discount()["metafields"][0]
    }
}

#[derive(Default)]
struct FakeState {
    requests: Mutex<Vec<RecordedRequest>>,
    responses: Mutex<VecDeque<(StatusCode, String)>>,
}

/// Fake Shopify Admin GraphQL endpoint.
pub struct FakeShopify {
    endpoint: String,
    state: Arc<FakeState>,
}

impl FakeShopify {
    /// Start the fake on an ephemeral port.
    pub async fn start() -> Self {
        let state = Arc::new(FakeState::default());
        let app = Router::new()
            .route("/admin/api/graphql.json", post(graphql))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
            .await
            .expect("bind fake Shopify");
        let addr = listener.local_addr().expect("fake Shopify address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake Shopify server");
        });

        Self {
            endpoint: format!("http://{addr}/admin/api/graphql.json"),
            state,
        }
    }

    /// Queue a `200 OK` JSON response.
    pub fn respond(&self, body: &Value) {
        self.respond_raw(StatusCode::OK, body.to_string());
    }

    /// Queue a response with an arbitrary status and body.
    pub fn respond_raw(&self, status: StatusCode, body: impl Into<String>) {
        self.state
            .responses
            .lock()
            .unwrap()
            .push_back((status, body.into()));
    }

    /// Every request received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    /// App configuration pointing at this fake.
    #[must_use]
    pub fn config(&self) -> AppConfig {
        AppConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
            shopify: ShopifyAdminConfig {
                store: TEST_STORE.to_string(),
                api_version: "2026-01".to_string(),
                access_token: SecretString::from(TEST_ACCESS_TOKEN),
                endpoint_override: Some(self.endpoint.clone()),
            },
            discount: DiscountConfig::default(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 0.0,
            sentry_traces_sample_rate: 0.0,
            tls: None,
        }
    }

    /// Admin client talking to this fake.
    #[must_use]
    pub fn client(&self) -> AdminClient {
        AdminClient::new(&self.config().shopify)
    }

    /// Application state talking to this fake.
    #[must_use]
    pub fn state(&self) -> AppState {
        AppState::new(self.config())
    }
}

async fn graphql(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let access_token = headers
        .get("X-Shopify-Access-Token")
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    state
        .requests
        .lock()
        .unwrap()
        .push(RecordedRequest { access_token, body });

    let next = state.responses.lock().unwrap().pop_front();
    match next {
        Some((status, body)) => (
            status,
            [("content-type", "application/json")],
            body,
        )
            .into_response(),
        None => (StatusCode::INTERNAL_SERVER_ERROR, "no response queued").into_response(),
    }
}

// =============================================================================
// Canned responses
// =============================================================================

/// A create mutation result.
#[must_use]
pub fn create_response(app_discount_key: &str, discount_id: &str, user_errors: &Value) -> Value {
    json!({
        "data": {
            "discountCreate": {
                app_discount_key: { "discountId": discount_id },
                "userErrors": user_errors,
            }
        }
    })
}

/// An update mutation result.
#[must_use]
pub fn update_response(app_discount_key: &str, discount_id: &str, user_errors: &Value) -> Value {
    json!({
        "data": {
            "discountUpdate": {
                app_discount_key: { "discountId": discount_id },
                "userErrors": user_errors,
            }
        }
    })
}

/// A discount read result for a code discount.
#[must_use]
pub fn code_discount_node(node_id: &str, code: &str, metafield: Option<(&str, &str)>) -> Value {
    json!({
        "data": {
            "discountNode": {
                "id": node_id,
                "metafield": metafield.map(|(id, value)| json!({ "id": id, "value": value })),
                "discount": {
                    "title": "",
                    "startsAt": "2026-03-01T00:00:00Z",
                    "endsAt": null,
                    "usageLimit": 25,
                    "appliesOncePerCustomer": false,
                    "codes": { "edges": [{ "node": { "code": code } }] },
                    "combinesWith": {
                        "orderDiscounts": false,
                        "productDiscounts": true,
                        "shippingDiscounts": false
                    }
                }
            }
        }
    })
}

/// A discount read result for an automatic discount.
#[must_use]
pub fn automatic_discount_node(node_id: &str, title: &str) -> Value {
    json!({
        "data": {
            "discountNode": {
                "id": node_id,
                "metafield": {
                    "id": "gid://shopify/Metafield/77",
                    "value": "{\"quantity\":3,\"percentage\":12.5}"
                },
                "discount": {
                    "title": title,
                    "startsAt": "2026-03-01T00:00:00Z",
                    "endsAt": "2026-04-01T00:00:00Z",
                    "combinesWith": {
                        "orderDiscounts": true,
                        "productDiscounts": false,
                        "shippingDiscounts": false
                    }
                }
            }
        }
    })
}
