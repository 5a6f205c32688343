//! Loader and action for the volume discount editor.
//!
//! Both the HTML editor and the JSON API go through these two functions. A
//! page load is one read. A JSON action is one write. An editor form post reads
//! the discount again before its one write, so the method and metafield ID come
//! from Shopify rather than from the posted fields.

use tracing::instrument;
use volume_discount_core::{CONFIGURATION_METAFIELD_KEY, DiscountRecord};

use crate::error::{AppError, Result};
use crate::form::SubmissionPayload;
use crate::shopify::UserError;
use crate::state::AppState;

/// Route identifier of a discount that does not exist yet.
pub const NEW_DISCOUNT_ID: &str = "new";

/// Load the discount behind a route identifier.
///
/// Returns `None` for [`NEW_DISCOUNT_ID`].
///
/// # Errors
///
/// Returns [`AppError::NotFound`] if Shopify has no such discount, or
/// [`AppError::Shopify`] if the read fails.
#[instrument(skip(state))]
pub async fn load(state: &AppState, id: &str) -> Result<Option<DiscountRecord>> {
    if id == NEW_DISCOUNT_ID {
        return Ok(None);
    }

    let namespace = &state.config().discount.metafield_namespace;
    state
        .shopify()
        .get_discount(id, namespace, CONFIGURATION_METAFIELD_KEY)
        .await?
        .map(Some)
        .ok_or_else(|| AppError::NotFound(format!("discount {id}")))
}

/// Create or update a discount from a submission payload.
///
/// An empty `id` creates; anything else updates that discount, reusing
/// `metafieldId` when one is given. Returns Shopify's field errors, empty on
/// success.
///
/// # Errors
///
/// Returns [`AppError::BadRequest`] if `discount` is not a valid record, or
/// [`AppError::Shopify`] if the mutation fails.
#[instrument(skip(state, payload), fields(id = %payload.id))]
pub async fn save(
    state: &AppState,
    function_id: &str,
    payload: &SubmissionPayload,
) -> Result<Vec<UserError>> {
    let record: DiscountRecord = serde_json::from_str(&payload.discount)
        .map_err(|e| AppError::BadRequest(format!("invalid discount: {e}")))?;

    let namespace = &state.config().discount.metafield_namespace;
    let outcome = if payload.id.is_empty() {
        state
            .shopify()
            .create_discount(&record, function_id, namespace)
            .await?
    } else {
        let metafield_id = Some(payload.metafield_id.as_str()).filter(|id| !id.is_empty());
        state
            .shopify()
            .update_discount(&record, &payload.id, function_id, namespace, metafield_id)
            .await?
    };

    if !outcome.is_success() {
        tracing::info!(
            user_errors = outcome.user_errors.len(),
            "Shopify rejected discount"
        );
    }

    Ok(outcome.user_errors)
}
