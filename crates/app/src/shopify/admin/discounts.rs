//! App-discount operations for the Admin API.

use tracing::instrument;
use volume_discount_core::{CONFIGURATION_METAFIELD_KEY, DiscountMethod, DiscountRecord};

use super::{
    AdminClient, AdminShopifyError,
    conversions::{automatic_app_input, code_app_input, convert_discount_node},
    queries::{
        self, CreateAutomaticAppDiscount, CreateCodeAppDiscount, DiscountMutationPayload,
        DiscountNodeData, UpdateAutomaticAppDiscount, UpdateCodeAppDiscount,
        build_discount_query,
    },
};
use crate::shopify::types::{MetafieldInput, SyncOutcome};

/// Turn a mutation payload into an outcome; a missing payload is a malformed
/// response, not an empty error list.
fn into_outcome(
    payload: Option<DiscountMutationPayload>,
    operation: &str,
) -> Result<SyncOutcome, AdminShopifyError> {
    let payload = payload.ok_or_else(|| {
        AdminShopifyError::UnexpectedResponse(format!("{operation} returned no payload"))
    })?;

    Ok(SyncOutcome {
        discount_id: payload.app_discount.map(|discount| discount.discount_id),
        user_errors: payload.user_errors,
    })
}

impl AdminClient {
    /// Create an app discount for `function_id` from a record.
    ///
    /// The configuration is attached as a new JSON metafield under
    /// `namespace`. Field errors come back in [`SyncOutcome::user_errors`].
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response has no mutation
    /// payload.
    #[instrument(skip(self, record), fields(method = %record.method))]
    pub async fn create_discount(
        &self,
        record: &DiscountRecord,
        function_id: &str,
        namespace: &str,
    ) -> Result<SyncOutcome, AdminShopifyError> {
        let metafield = MetafieldInput::create(
            namespace,
            CONFIGURATION_METAFIELD_KEY,
            record.configuration.to_json()?,
        );

        let payload = match record.method {
            DiscountMethod::Code => {
                let variables = queries::create_code_app_discount::Variables {
                    discount: code_app_input(record, function_id, metafield),
                };
                self.execute::<CreateCodeAppDiscount>(variables)
                    .await?
                    .discount_create
            }
            DiscountMethod::Automatic => {
                let variables = queries::create_automatic_app_discount::Variables {
                    discount: automatic_app_input(record, function_id, metafield),
                };
                self.execute::<CreateAutomaticAppDiscount>(variables)
                    .await?
                    .discount_create
            }
        };

        let outcome = into_outcome(payload, "discount create")?;
        tracing::info!(
            discount_id = ?outcome.discount_id,
            user_errors = outcome.user_errors.len(),
            "Discount create completed"
        );
        Ok(outcome)
    }

    /// Update the app discount `id` from a record.
    ///
    /// With a known `metafield_id` the existing configuration entry is updated
    /// in place; without one it is attached under `namespace` for the first
    /// time.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response has no mutation
    /// payload.
    #[instrument(skip(self, record), fields(method = %record.method))]
    pub async fn update_discount(
        &self,
        record: &DiscountRecord,
        id: &str,
        function_id: &str,
        namespace: &str,
        metafield_id: Option<&str>,
    ) -> Result<SyncOutcome, AdminShopifyError> {
        let value = record.configuration.to_json()?;
        let metafield = match metafield_id {
            Some(metafield_id) => MetafieldInput::update(metafield_id, value),
            None => MetafieldInput::create(namespace, CONFIGURATION_METAFIELD_KEY, value),
        };

        let payload = match record.method {
            DiscountMethod::Code => {
                let variables = queries::update_code_app_discount::Variables {
                    id: id.to_string(),
                    discount: code_app_input(record, function_id, metafield),
                };
                self.execute::<UpdateCodeAppDiscount>(variables)
                    .await?
                    .discount_update
            }
            DiscountMethod::Automatic => {
                let variables = queries::update_automatic_app_discount::Variables {
                    id: id.to_string(),
                    discount: automatic_app_input(record, function_id, metafield),
                };
                self.execute::<UpdateAutomaticAppDiscount>(variables)
                    .await?
                    .discount_update
            }
        };

        let outcome = into_outcome(payload, "discount update")?;
        tracing::info!(
            user_errors = outcome.user_errors.len(),
            "Discount update completed"
        );
        Ok(outcome)
    }

    /// Get a discount and its configuration.
    ///
    /// # Arguments
    ///
    /// * `id` - Numeric discount ID or full global ID
    /// * `namespace` - Metafield namespace of the configuration
    /// * `key` - Metafield key of the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the discount's subtype is not
    /// known, or its configuration metafield is not valid JSON.
    #[instrument(skip(self), fields(discount_id = %id))]
    pub async fn get_discount(
        &self,
        id: &str,
        namespace: &str,
        key: &str,
    ) -> Result<Option<DiscountRecord>, AdminShopifyError> {
        let query = build_discount_query(namespace, key, id);
        let response: DiscountNodeData = self.execute_document(&query).await?;

        response
            .discount_node
            .map(|node| convert_discount_node(node, id))
            .transpose()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::shopify::types::UserError;
    use queries::AppDiscountRef;

    #[test]
    fn test_missing_payload_is_an_error() {
        let err = into_outcome(None, "discount update").unwrap_err();
        assert!(matches!(err, AdminShopifyError::UnexpectedResponse(_)));
    }

    #[test]
    fn test_user_errors_kept_in_order() {
        let payload = DiscountMutationPayload {
            app_discount: None,
            user_errors: vec![
                UserError::new(&["title"], "too short"),
                UserError::new(&["code"], "is taken"),
            ],
        };
        let outcome = into_outcome(Some(payload), "discount create").unwrap();
        assert_eq!(outcome.user_errors[0].message, "too short");
        assert_eq!(outcome.user_errors[1].message, "is taken");
        assert!(!outcome.is_success());
    }

    #[test]
    fn test_outcome_carries_discount_id() {
        let payload = DiscountMutationPayload {
            app_discount: Some(AppDiscountRef {
                discount_id: "gid://shopify/DiscountCodeApp/1".to_string(),
            }),
            user_errors: vec![],
        };
        let outcome = into_outcome(Some(payload), "discount create").unwrap();
        assert!(outcome.is_success());
        assert_eq!(
            outcome.discount_id.as_deref(),
            Some("gid://shopify/DiscountCodeApp/1")
        );
    }
}
