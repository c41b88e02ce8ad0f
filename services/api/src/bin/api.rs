//! services/api/src/bin/api.rs

use api_lib::{
    adapters::MemoryStore,
    config::Config,
    error::ApiError,
    web::{
        appointments::{
            cancel_appointment_handler, create_appointment_handler, list_appointments_handler,
        },
        auth::{login_handler, logout_handler},
        intake::{demo_steps_handler, get_intake_handler, save_intake_handler},
        middleware::require_auth,
        providers::{list_providers_handler, provider_slots_handler},
        state::AppState,
        ApiDoc,
    },
};
use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use intake_core::{
    directory::ProviderDirectory,
    ledger::AppointmentLedger,
    ports::{AppointmentStore, IntakeStore, SessionStore},
    steps::demo_steps,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Build the Stores and Reference Data ---
    // One process-local store backs all three ports; state clears on restart.
    let store = Arc::new(MemoryStore::new());
    let intake: Arc<dyn IntakeStore> = store.clone();
    let sessions: Arc<dyn SessionStore> = store.clone();
    let appointments: Arc<dyn AppointmentStore> = store;

    let directory = Arc::new(ProviderDirectory::with_demo_roster());
    let steps = Arc::new(demo_steps());
    let ledger = AppointmentLedger::new(appointments, directory.clone());

    // --- 3. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        config: config.clone(),
        steps,
        directory,
        intake,
        sessions,
        ledger,
    });

    let cors = CorsLayer::new()
        .allow_origin(
            config
                .cors_origin
                .parse::<HeaderValue>()
                .map_err(|e| ApiError::Internal(format!("Invalid CORS_ORIGIN: {}", e)))?,
        )
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // --- 4. Create the Web Router ---
    // Public routes (reads tolerate anonymity; POST /intake checks itself)
    let public_routes = Router::new()
        .route("/auth/login", post(login_handler))
        .route("/auth/logout", post(logout_handler))
        .route("/demo-steps", get(demo_steps_handler))
        .route("/intake", get(get_intake_handler).post(save_intake_handler))
        .route("/providers", get(list_providers_handler))
        .route("/providers/{id}/slots", get(provider_slots_handler));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route(
            "/appointments",
            get(list_appointments_handler).post(create_appointment_handler),
        )
        .route("/appointments/{id}", patch(cancel_appointment_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    // Combine API routes
    let api_router = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(cors)
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
