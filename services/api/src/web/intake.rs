//! services/api/src/web/intake.rs
//!
//! Handlers for the conversational intake flow: the static step sequence,
//! the per-identity response record, and its save endpoint.

use axum::{
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::web::middleware::resolve_identity;
use crate::web::state::AppState;
use intake_core::domain::{IntakeRecord, IntakeStep, StepKind};
use intake_core::ports::PortError;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// A step flattened for the wire: the kind-specific payload becomes optional
/// fields that are present iff the kind carries them.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StepPayload {
    pub id: String,
    pub title: String,
    pub message: String,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_steps: Option<Vec<String>>,
}

impl From<&IntakeStep> for StepPayload {
    fn from(step: &IntakeStep) -> Self {
        let mut payload = StepPayload {
            id: step.id.clone(),
            title: step.title.clone(),
            message: step.message.clone(),
            kind: step.kind.name().to_string(),
            options: None,
            min: None,
            max: None,
            severity: None,
            next_steps: None,
        };
        match &step.kind {
            StepKind::Message => {}
            StepKind::Question { options } => payload.options = Some(options.clone()),
            StepKind::Scale { min, max } => {
                payload.min = Some(*min);
                payload.max = Some(*max);
            }
            StepKind::Recommendation {
                severity,
                next_steps,
            } => {
                payload.severity = Some(severity.clone());
                payload.next_steps = Some(next_steps.clone());
            }
        }
        payload
    }
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DemoStepsResponse {
    pub mode: String,
    pub steps: Vec<StepPayload>,
    pub total_steps: usize,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IntakeRecordPayload {
    pub responses: HashMap<String, String>,
    /// Completion moment as epoch milliseconds; absent while in progress.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
}

impl From<IntakeRecord> for IntakeRecordPayload {
    fn from(record: IntakeRecord) -> Self {
        IntakeRecordPayload {
            responses: record.responses,
            completed_at: record.completed_at.map(|t| t.timestamp_millis()),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct IntakeEnvelope {
    pub intake: Option<IntakeRecordPayload>,
}

#[derive(Deserialize, ToSchema)]
pub struct SaveIntakeRequest {
    /// The full accumulated response map; each save replaces the stored map
    /// wholesale. An empty map expresses a restart.
    pub responses: HashMap<String, String>,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Serialize, ToSchema)]
pub struct SaveIntakeResponse {
    pub ok: bool,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// GET /demo-steps - The fixed intake step sequence
#[utoipa::path(
    get,
    path = "/demo-steps",
    responses(
        (status = 200, description = "The intake step sequence", body = DemoStepsResponse)
    )
)]
pub async fn demo_steps_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let steps: Vec<StepPayload> = state.steps.iter().map(StepPayload::from).collect();
    let total_steps = steps.len();
    Json(DemoStepsResponse {
        mode: "demo".to_string(),
        steps,
        total_steps,
    })
}

/// GET /intake - The caller's intake record
///
/// Anonymous callers get `{ "intake": null }` rather than an error.
#[utoipa::path(
    get,
    path = "/intake",
    responses(
        (status = 200, description = "The caller's intake record, or null", body = IntakeEnvelope)
    )
)]
pub async fn get_intake_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let intake = match resolve_identity(&state, &headers).await {
        Some(identity) => state
            .intake
            .load_record(&identity)
            .await?
            .map(IntakeRecordPayload::from),
        None => None,
    };
    Ok(Json(IntakeEnvelope { intake }))
}

/// POST /intake - Save the caller's intake record
#[utoipa::path(
    post,
    path = "/intake",
    request_body = SaveIntakeRequest,
    responses(
        (status = 200, description = "Record saved", body = SaveIntakeResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn save_intake_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<SaveIntakeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // Reads tolerate anonymity; writes do not.
    let identity = resolve_identity(&state, &headers)
        .await
        .ok_or(ApiError::Port(PortError::Unauthorized))?;

    state
        .intake
        .save_record(&identity, req.responses, req.completed)
        .await?;
    Ok(Json(SaveIntakeResponse { ok: true }))
}
