//! Volume discount editor route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Json,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use serde::Serialize;
use tracing::instrument;
use volume_discount_core::{DiscountConfiguration, DiscountMethod, DiscountRecord};

use crate::error::Result;
use crate::form::{DiscountForm, DiscountFormInput, ErrorBanner, SubmissionPayload};
use crate::services::volume_discount::{self, NEW_DISCOUNT_ID};
use crate::shopify::UserError;
use crate::state::AppState;

/// Configuration input view for templates.
#[derive(Debug, Clone)]
pub struct ConfigurationFieldView {
    pub name: &'static str,
    pub label: &'static str,
    pub suffix: Option<&'static str>,
    pub value: String,
}

/// Summary card content.
#[derive(Debug, Clone)]
pub struct SummaryView {
    pub method: &'static str,
    pub descriptor: String,
    pub discount_name: String,
    pub details: String,
    pub usage: Vec<String>,
    pub active_dates: String,
}

impl SummaryView {
    fn new(form: &DiscountForm, discount_name: &str) -> Self {
        let descriptor = match form.method {
            DiscountMethod::Automatic => form.title.clone(),
            DiscountMethod::Code => form.code.clone(),
        };

        let details = DiscountConfiguration::from_field_text(|name| form.configuration_value(name))
            .map_or_else(|_| "Not configured".to_string(), |config| config.to_string());

        let mut usage = Vec::new();
        if form.method == DiscountMethod::Code {
            match form.usage_limit.trim() {
                "" => usage.push("No usage limits".to_string()),
                limit => usage.push(format!("Limited to {limit} total uses")),
            }
            if form.applies_once_per_customer {
                usage.push("One use per customer".to_string());
            }
        }

        let active_dates = if form.ends_at.trim().is_empty() {
            format!("Active from {}", form.starts_at)
        } else {
            format!("Active from {} until {}", form.starts_at, form.ends_at)
        };

        Self {
            method: form.method.as_str(),
            descriptor,
            discount_name: discount_name.to_string(),
            details,
            usage,
            active_dates,
        }
    }
}

/// Discount editor page template.
#[derive(Template, WebTemplate)]
#[template(path = "volume_discount/edit.html")]
pub struct VolumeDiscountTemplate {
    pub page_title: &'static str,
    pub discount_name: String,
    pub action_url: String,
    pub discounts_url: String,
    pub form: DiscountForm,
    pub is_code: bool,
    pub configuration_fields: Vec<ConfigurationFieldView>,
    pub banner: Option<ErrorBanner>,
    pub summary: SummaryView,
}

impl VolumeDiscountTemplate {
    fn new(state: &AppState, function_id: &str, id: &str, form: DiscountForm) -> Self {
        let discount_name = state.config().discount.name.clone();
        let configuration_fields = DiscountConfiguration::FIELDS
            .iter()
            .map(|field| ConfigurationFieldView {
                name: field.name,
                label: field.label,
                suffix: field.suffix,
                value: form
                    .configuration_value(field.name)
                    .unwrap_or(field.default)
                    .to_string(),
            })
            .collect();

        Self {
            page_title: if form.is_new() {
                "New discount"
            } else {
                "Edit discount"
            },
            action_url: format!("/volume-discount/{function_id}/{id}"),
            discounts_url: state.config().shopify.discounts_admin_url(),
            is_code: form.method == DiscountMethod::Code,
            configuration_fields,
            banner: form.error_banner(),
            summary: SummaryView::new(&form, &discount_name),
            discount_name,
            form,
        }
    }
}

/// Loader response.
#[derive(Debug, Serialize)]
pub struct LoaderResponse {
    pub discount: Option<DiscountRecord>,
}

/// Action response.
#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub errors: Vec<UserError>,
}

async fn load_form(state: &AppState, id: &str) -> Result<DiscountForm> {
    Ok(volume_discount::load(state, id)
        .await?
        .map_or_else(|| DiscountForm::blank(Utc::now()), |record| DiscountForm::from_record(&record)))
}

/// Editor page handler.
#[instrument(skip(state))]
pub async fn edit(
    State(state): State<AppState>,
    Path((function_id, id)): Path<(String, String)>,
) -> Result<VolumeDiscountTemplate> {
    let form = load_form(&state, &id).await?;
    Ok(VolumeDiscountTemplate::new(&state, &function_id, &id, form))
}

/// Editor form submission handler.
///
/// Redirects to the store's discount list once Shopify accepts the discount,
/// otherwise renders the editor again with the errors.
#[instrument(skip(state, input))]
pub async fn submit(
    State(state): State<AppState>,
    Path((function_id, id)): Path<(String, String)>,
    Form(input): Form<DiscountFormInput>,
) -> Result<Response> {
    let mut form = load_form(&state, &id).await?;
    form.apply_input(input);

    if let Some(payload) = form.submit() {
        let errors = volume_discount::save(&state, &function_id, &payload).await?;
        form.complete(errors);
    }

    if form.is_submitted() {
        tracing::info!(function_id = %function_id, new = id == NEW_DISCOUNT_ID, "Discount saved");
        return Ok(Redirect::to(&state.config().shopify.discounts_admin_url()).into_response());
    }

    Ok(VolumeDiscountTemplate::new(&state, &function_id, &id, form).into_response())
}

/// Loader as JSON.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path((_, id)): Path<(String, String)>,
) -> Result<Json<LoaderResponse>> {
    let discount = volume_discount::load(&state, &id).await?;
    Ok(Json(LoaderResponse { discount }))
}

/// Action taking a raw submission payload.
#[instrument(skip(state, payload))]
pub async fn action(
    State(state): State<AppState>,
    Path(function_id): Path<String>,
    Form(payload): Form<SubmissionPayload>,
) -> Result<Json<ActionResponse>> {
    let errors = volume_discount::save(&state, &function_id, &payload).await?;
    Ok(Json(ActionResponse { errors }))
}
