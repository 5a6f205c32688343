//! GraphQL documents for the Shopify Admin discount API.
//!
//! The four app-discount mutations implement `graphql_client::GraphQLQuery` by
//! hand (the selection sets are small and fixed). The discount read query is
//! built at runtime by [`build_discount_query`] because it embeds the metafield
//! namespace and key.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use graphql_client::{GraphQLQuery, QueryBody};
use serde::Deserialize;
use volume_discount_core::{DiscountCombinesWith, DiscountMethod, DiscountSubtype, discount_node_gid};

use crate::shopify::types::UserError;

// =============================================================================
// Discount read query
// =============================================================================

/// Fields selected on code discount subtypes.
const CODE_DISCOUNT_SELECTION: &str = "title
        startsAt
        endsAt
        usageLimit
        appliesOncePerCustomer
        codes(first: 3) {
          edges {
            node {
              code
            }
          }
        }
        combinesWith {
          orderDiscounts
          productDiscounts
          shippingDiscounts
        }";

/// Fields selected on automatic discount subtypes.
const AUTOMATIC_DISCOUNT_SELECTION: &str = "title
        startsAt
        endsAt
        combinesWith {
          orderDiscounts
          productDiscounts
          shippingDiscounts
        }";

/// Build the query that reads one discount node and its configuration
/// metafield.
///
/// The discount union is selected through a `... on <Subtype>` block for each
/// of the eight concrete subtypes, so the query succeeds whatever subtype `id`
/// resolves to. `id` may be a bare numeric id or a full global ID.
#[must_use]
pub fn build_discount_query(namespace: &str, key: &str, id: &str) -> String {
    let mut fragments = String::new();
    for subtype in DiscountSubtype::CONCRETE {
        let selection = match subtype.method() {
            DiscountMethod::Code => CODE_DISCOUNT_SELECTION,
            DiscountMethod::Automatic => AUTOMATIC_DISCOUNT_SELECTION,
        };
        let _ = write!(
            fragments,
            "\n      ... on {} {{\n        {selection}\n      }}",
            subtype.typename()
        );
    }

    format!(
        "query DiscountNodeConfiguration {{
  discountNode(id: {id}) {{
    id
    metafield(namespace: {namespace}, key: {key}) {{
      id
      value
    }}
    discount {{{fragments}
    }}
  }}
}}",
        id = graphql_string(&discount_node_gid(id)),
        namespace = graphql_string(namespace),
        key = graphql_string(key),
    )
}

/// Quote a value as a GraphQL string literal.
///
/// JSON string escaping is a subset of GraphQL's, control characters included.
fn graphql_string(value: &str) -> String {
    serde_json::Value::from(value).to_string()
}

/// Response of [`build_discount_query`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountNodeData {
    pub discount_node: Option<DiscountNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiscountNode {
    pub id: String,
    pub metafield: Option<DiscountMetafield>,
    pub discount: Option<DiscountFields>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiscountMetafield {
    pub id: String,
    pub value: String,
}

/// Union of the fields selected across all subtypes; anything a subtype does
/// not select stays `None`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountFields {
    pub title: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub usage_limit: Option<i64>,
    pub applies_once_per_customer: Option<bool>,
    pub codes: Option<DiscountCodeConnection>,
    pub combines_with: Option<DiscountCombinesWith>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiscountCodeConnection {
    pub edges: Vec<DiscountCodeEdge>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiscountCodeEdge {
    pub node: DiscountCodeNode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiscountCodeNode {
    pub code: String,
}

// =============================================================================
// Discount mutations
// =============================================================================

/// Payload shared by the four app-discount mutations.
///
/// `userErrors` is required: a payload without it is a malformed response,
/// not a successful one.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountMutationPayload {
    #[serde(default, alias = "codeAppDiscount", alias = "automaticAppDiscount")]
    pub app_discount: Option<AppDiscountRef>,
    pub user_errors: Vec<UserError>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppDiscountRef {
    pub discount_id: String,
}

/// Response data of the create mutations (aliased `discountCreate`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountCreateData {
    pub discount_create: Option<DiscountMutationPayload>,
}

/// Response data of the update mutations (aliased `discountUpdate`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountUpdateData {
    pub discount_update: Option<DiscountMutationPayload>,
}

macro_rules! discount_mutation {
    ($name:ident, $module:ident, $input:ty, $response:ty, $query:expr, { $($var:ident : $ty:ty),* $(,)? }) => {
        pub struct $name;

        pub mod $module {
            use serde::Serialize;

            pub const OPERATION_NAME: &str = stringify!($name);
            pub const QUERY: &str = $query;

            #[derive(Debug, Clone, Serialize)]
            pub struct Variables {
                $(pub $var: $ty,)*
                pub discount: $input,
            }

            pub type ResponseData = $response;
        }

        impl GraphQLQuery for $name {
            type Variables = $module::Variables;
            type ResponseData = $module::ResponseData;

            fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
                QueryBody {
                    variables,
                    query: $module::QUERY,
                    operation_name: $module::OPERATION_NAME,
                }
            }
        }
    };
}

discount_mutation!(
    CreateCodeAppDiscount,
    create_code_app_discount,
    crate::shopify::types::DiscountCodeAppInput,
    super::DiscountCreateData,
    "mutation CreateCodeAppDiscount($discount: DiscountCodeAppInput!) {
  discountCreate: discountCodeAppCreate(codeAppDiscount: $discount) {
    codeAppDiscount {
      discountId
    }
    userErrors {
      code
      message
      field
    }
  }
}",
    {}
);

discount_mutation!(
    CreateAutomaticAppDiscount,
    create_automatic_app_discount,
    crate::shopify::types::DiscountAutomaticAppInput,
    super::DiscountCreateData,
    "mutation CreateAutomaticAppDiscount($discount: DiscountAutomaticAppInput!) {
  discountCreate: discountAutomaticAppCreate(automaticAppDiscount: $discount) {
    automaticAppDiscount {
      discountId
    }
    userErrors {
      code
      message
      field
    }
  }
}",
    {}
);

discount_mutation!(
    UpdateCodeAppDiscount,
    update_code_app_discount,
    crate::shopify::types::DiscountCodeAppInput,
    super::DiscountUpdateData,
    "mutation UpdateCodeAppDiscount($id: ID!, $discount: DiscountCodeAppInput!) {
  discountUpdate: discountCodeAppUpdate(id: $id, codeAppDiscount: $discount) {
    codeAppDiscount {
      discountId
    }
    userErrors {
      code
      message
      field
    }
  }
}",
    { id: String }
);

discount_mutation!(
    UpdateAutomaticAppDiscount,
    update_automatic_app_discount,
    crate::shopify::types::DiscountAutomaticAppInput,
    super::DiscountUpdateData,
    "mutation UpdateAutomaticAppDiscount($id: ID!, $discount: DiscountAutomaticAppInput!) {
  discountUpdate: discountAutomaticAppUpdate(id: $id, automaticAppDiscount: $discount) {
    automaticAppDiscount {
      discountId
    }
    userErrors {
      code
      message
      field
    }
  }
}",
    { id: String }
);
