//! services/api/src/web/mod.rs
//!
//! The HTTP surface: handlers, auth middleware, shared state, and the master
//! OpenAPI definition.

pub mod appointments;
pub mod auth;
pub mod intake;
pub mod middleware;
pub mod providers;
pub mod state;

pub use middleware::require_auth;

use utoipa::OpenApi;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::login_handler,
        auth::logout_handler,
        intake::demo_steps_handler,
        intake::get_intake_handler,
        intake::save_intake_handler,
        providers::list_providers_handler,
        providers::provider_slots_handler,
        appointments::list_appointments_handler,
        appointments::create_appointment_handler,
        appointments::cancel_appointment_handler,
    ),
    components(schemas(
        auth::LoginRequest,
        auth::AuthResponse,
        intake::StepPayload,
        intake::DemoStepsResponse,
        intake::IntakeRecordPayload,
        intake::IntakeEnvelope,
        intake::SaveIntakeRequest,
        intake::SaveIntakeResponse,
        providers::ProviderPayload,
        providers::ProviderListResponse,
        providers::SlotListResponse,
        appointments::AppointmentPayload,
        appointments::AppointmentListResponse,
        appointments::AppointmentResponse,
        appointments::CreateAppointmentRequest,
        appointments::UpdateAppointmentRequest,
    )),
    tags(
        (name = "Intake API", description = "API endpoints for the patient intake and booking demo.")
    )
)]
pub struct ApiDoc;
