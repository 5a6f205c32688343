//! Shopify Admin API client for discount functions.
//!
//! # Architecture
//!
//! - Uses `graphql-client`'s `GraphQLQuery` contract for the discount mutations
//! - The discount read query is built at runtime (it depends on the metafield
//!   namespace) and sent through the same execution path
//! - Direct API calls to Shopify, no local persistence
//! - One round-trip per call, no retries
//!
//! # Example
//!
//! ```rust,ignore
//! use volume_discount_app::shopify::AdminClient;
//!
//! let client = AdminClient::new(&config.shopify);
//!
//! let discount = client
//!     .get_discount("123", "$app:volume-discount", "function-configuration")
//!     .await?;
//!
//! let outcome = client
//!     .create_discount(&record, "function-id", "$app:volume-discount")
//!     .await?;
//! ```

mod admin;
pub mod types;

pub use admin::AdminClient;
pub use admin::queries::build_discount_query;
pub use types::*;

use thiserror::Error;

/// Errors that can occur when interacting with Shopify Admin API.
///
/// Field-level validation problems are not errors: they come back as
/// [`UserError`]s inside a successful [`SyncOutcome`].
#[derive(Debug, Error)]
pub enum AdminShopifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Shopify answered with a non-success status.
    #[error("Unexpected status {0}: {1}")]
    Status(u16, String),

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Authentication/authorization failed.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The response parsed but lacks the payload the operation selects.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// A discount node whose subtype this app does not know.
    #[error("Unknown discount type: {0}")]
    UnknownDiscountType(String),
}

/// A GraphQL error returned by the Shopify Admin API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    errors
        .iter()
        .map(|e| e.message.clone())
        .collect::<Vec<_>>()
        .join("; ")
}
