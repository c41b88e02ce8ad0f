//! services/api/src/web/providers.rs
//!
//! Handlers for the provider directory and the per-day slot listing.

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::web::state::AppState;
use intake_core::domain::Provider;
use intake_core::ports::PortError;
use intake_core::slots;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct ProviderPayload {
    pub id: String,
    pub name: String,
    pub specialty: String,
    pub credentials: String,
    pub bio: String,
    pub availability: String,
}

impl From<&Provider> for ProviderPayload {
    fn from(provider: &Provider) -> Self {
        ProviderPayload {
            id: provider.id.clone(),
            name: provider.name.clone(),
            specialty: provider.specialty.clone(),
            credentials: provider.credentials.clone(),
            bio: provider.bio.clone(),
            availability: provider.availability.clone(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct ProviderListResponse {
    pub providers: Vec<ProviderPayload>,
}

#[derive(Deserialize)]
pub struct ProviderListQuery {
    pub specialty: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SlotListResponse {
    pub date: String,
    pub provider_id: String,
    pub slots: Vec<String>,
}

#[derive(Deserialize)]
pub struct SlotQuery {
    pub date: Option<String>,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// GET /providers - The provider roster, optionally filtered
#[utoipa::path(
    get,
    path = "/providers",
    params(
        ("specialty" = Option<String>, Query, description = "Case-insensitive substring over specialty and credentials")
    ),
    responses(
        (status = 200, description = "Matching providers in roster order", body = ProviderListResponse)
    )
)]
pub async fn list_providers_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProviderListQuery>,
) -> impl IntoResponse {
    let providers = state
        .directory
        .list(query.specialty.as_deref())
        .into_iter()
        .map(ProviderPayload::from)
        .collect();
    Json(ProviderListResponse { providers })
}

/// GET /providers/{id}/slots - Bookable start times for one day
#[utoipa::path(
    get,
    path = "/providers/{id}/slots",
    params(
        ("id" = String, Path, description = "Provider id"),
        ("date" = String, Query, description = "Calendar date, YYYY-MM-DD")
    ),
    responses(
        (status = 200, description = "Bookable slots; empty on closed days", body = SlotListResponse),
        (status = 400, description = "Missing or malformed date"),
        (status = 404, description = "Unknown provider")
    )
)]
pub async fn provider_slots_handler(
    State(state): State<Arc<AppState>>,
    Path(provider_id): Path<String>,
    Query(query): Query<SlotQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let date = query
        .date
        .ok_or_else(|| ApiError::Port(PortError::Validation("date is required".to_string())))?;

    let today = Local::now().date_naive();
    let slots = slots::slots_for(&state.directory, &provider_id, &date, today)?;
    Ok(Json(SlotListResponse {
        date,
        provider_id,
        slots,
    }))
}
