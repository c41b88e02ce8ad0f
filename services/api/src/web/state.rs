//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use intake_core::directory::ProviderDirectory;
use intake_core::domain::IntakeStep;
use intake_core::ledger::AppointmentLedger;
use intake_core::ports::{IntakeStore, SessionStore};
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Connections)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// The fixed intake step sequence, built once at startup.
    pub steps: Arc<Vec<IntakeStep>>,
    pub directory: Arc<ProviderDirectory>,
    pub intake: Arc<dyn IntakeStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub ledger: AppointmentLedger,
}
