//! crates/intake_core/src/ports.rs
//!
//! Defines the storage contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the concrete backing store (in-memory maps today, a
//! database or distributed cache tomorrow).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use uuid::Uuid;

use crate::domain::{Appointment, IntakeRecord};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
///
/// The four caller-facing kinds map one-to-one onto HTTP statuses at the
/// request boundary, so handlers never inspect message text.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Store Ports (Traits)
//=========================================================================================

/// Keyed store for per-identity intake records.
#[async_trait]
pub trait IntakeStore: Send + Sync {
    /// Overwrites the identity's response map wholesale.
    ///
    /// `completed_at` is set to now iff `completed` is true; an empty
    /// `responses` map clears it (that is how a restart is expressed);
    /// otherwise any prior completion timestamp is preserved.
    async fn save_record(
        &self,
        identity: &str,
        responses: HashMap<String, String>,
        completed: bool,
    ) -> PortResult<()>;

    /// Tolerant read: an identity with no record yields `None`.
    async fn load_record(&self, identity: &str) -> PortResult<Option<IntakeRecord>>;
}

/// Keyed store for per-identity appointment collections.
///
/// The store only holds rows; validation, conflict checks and listing order
/// live in the ledger so a backing store can be swapped without touching them.
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    /// Appends a new appointment to the identity's collection.
    async fn append(&self, appointment: Appointment) -> PortResult<()>;

    /// Returns every appointment the identity owns, in insertion order.
    async fn list_for(&self, identity: &str) -> PortResult<Vec<Appointment>>;

    /// Marks the identity's appointment cancelled in place and returns the
    /// updated row. Fails with `NotFound` if the identity owns no such id.
    /// Cancelling an already-cancelled appointment succeeds silently.
    async fn cancel(&self, identity: &str, appointment_id: Uuid) -> PortResult<Appointment>;
}

/// Resolves opaque session tokens to identities (browser login sessions).
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Creates a session for the identity and returns the opaque token.
    async fn create_session(
        &self,
        identity: &str,
        expires_at: DateTime<Utc>,
    ) -> PortResult<String>;

    /// Resolves a token to its identity. Fails with `Unauthorized` for an
    /// unknown or expired token.
    async fn resolve_session(&self, token: &str) -> PortResult<String>;

    async fn delete_session(&self, token: &str) -> PortResult<()>;
}
