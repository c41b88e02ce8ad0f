//! services/api/src/web/appointments.rs
//!
//! Handlers for the per-identity appointment ledger. Every route here sits
//! behind the auth middleware; the identity arrives via request extensions.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ApiError;
use crate::web::middleware::Identity;
use crate::web::state::AppState;
use intake_core::domain::Appointment;
use intake_core::ledger::NewAppointment;
use intake_core::ports::PortError;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentPayload {
    pub id: Uuid,
    pub user_identity: String,
    pub provider_id: String,
    pub provider_name: String,
    pub specialty: String,
    /// Calendar date, YYYY-MM-DD.
    pub date: String,
    /// Zero-padded 24h start time, HH:MM.
    pub time_slot: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub status: String,
    /// Creation moment as epoch milliseconds.
    pub created_at: i64,
}

impl From<Appointment> for AppointmentPayload {
    fn from(appointment: Appointment) -> Self {
        AppointmentPayload {
            id: appointment.id,
            user_identity: appointment.identity,
            provider_id: appointment.provider_id,
            provider_name: appointment.provider_name,
            specialty: appointment.specialty,
            date: appointment.date.to_string(),
            time_slot: appointment.time_slot,
            reason: appointment.reason,
            status: appointment.status.name().to_string(),
            created_at: appointment.created_at.timestamp_millis(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct AppointmentListResponse {
    pub appointments: Vec<AppointmentPayload>,
}

#[derive(Serialize, ToSchema)]
pub struct AppointmentResponse {
    pub appointment: AppointmentPayload,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    pub provider_id: String,
    pub provider_name: String,
    pub specialty: String,
    pub date: String,
    pub time_slot: String,
    pub reason: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateAppointmentRequest {
    pub status: String,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// GET /appointments - The caller's confirmed appointments
#[utoipa::path(
    get,
    path = "/appointments",
    responses(
        (status = 200, description = "Confirmed appointments in chronological order", body = AppointmentListResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_appointments_handler(
    State(state): State<Arc<AppState>>,
    Extension(Identity(identity)): Extension<Identity>,
) -> Result<impl IntoResponse, ApiError> {
    let appointments = state
        .ledger
        .list(&identity, false)
        .await?
        .into_iter()
        .map(AppointmentPayload::from)
        .collect();
    Ok(Json(AppointmentListResponse { appointments }))
}

/// POST /appointments - Book an appointment
#[utoipa::path(
    post,
    path = "/appointments",
    request_body = CreateAppointmentRequest,
    responses(
        (status = 201, description = "Appointment booked", body = AppointmentResponse),
        (status = 400, description = "Missing or malformed fields"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Unknown provider"),
        (status = 409, description = "Slot not bookable or already taken")
    )
)]
pub async fn create_appointment_handler(
    State(state): State<Arc<AppState>>,
    Extension(Identity(identity)): Extension<Identity>,
    Json(req): Json<CreateAppointmentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let appointment = state
        .ledger
        .create(
            &identity,
            NewAppointment {
                provider_id: req.provider_id,
                provider_name: req.provider_name,
                specialty: req.specialty,
                date: req.date,
                time_slot: req.time_slot,
                reason: req.reason,
            },
        )
        .await?;
    info!(
        "Booked appointment {} on {} at {}",
        appointment.id, appointment.date, appointment.time_slot
    );

    Ok((
        StatusCode::CREATED,
        Json(AppointmentResponse {
            appointment: appointment.into(),
        }),
    ))
}

/// PATCH /appointments/{id} - Cancel an appointment
///
/// The only supported transition is to "cancelled"; anything else is
/// rejected before the ledger is consulted.
#[utoipa::path(
    patch,
    path = "/appointments/{id}",
    request_body = UpdateAppointmentRequest,
    params(
        ("id" = Uuid, Path, description = "Appointment id")
    ),
    responses(
        (status = 200, description = "Appointment cancelled", body = AppointmentResponse),
        (status = 400, description = "Unsupported status value"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "No such appointment for this caller")
    )
)]
pub async fn cancel_appointment_handler(
    State(state): State<Arc<AppState>>,
    Extension(Identity(identity)): Extension<Identity>,
    Path(appointment_id): Path<Uuid>,
    Json(req): Json<UpdateAppointmentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.status != "cancelled" {
        return Err(ApiError::Port(PortError::Validation(format!(
            "unsupported status '{}'; only 'cancelled' is allowed",
            req.status
        ))));
    }

    let appointment = state.ledger.cancel(&identity, appointment_id).await?;
    Ok(Json(AppointmentResponse {
        appointment: appointment.into(),
    }))
}
