//! crates/intake_core/src/ledger.rs
//!
//! The per-identity appointment ledger: validated create, ordered list and
//! cancel over an injected `AppointmentStore`.

use chrono::{Local, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::directory::ProviderDirectory;
use crate::domain::{Appointment, AppointmentStatus};
use crate::ports::{AppointmentStore, PortError, PortResult};
use crate::slots;

/// The caller-supplied fields of a booking request, before validation.
#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub provider_id: String,
    pub provider_name: String,
    pub specialty: String,
    pub date: String,
    pub time_slot: String,
    pub reason: Option<String>,
}

/// Drives appointment creation, listing and cancellation for one store.
///
/// All request validation and the slot-conflict guard live here so that the
/// backing store stays a plain keyed collection.
#[derive(Clone)]
pub struct AppointmentLedger {
    store: Arc<dyn AppointmentStore>,
    directory: Arc<ProviderDirectory>,
}

impl AppointmentLedger {
    pub fn new(store: Arc<dyn AppointmentStore>, directory: Arc<ProviderDirectory>) -> Self {
        Self { store, directory }
    }

    /// Books an appointment for `identity`.
    ///
    /// The requested slot must be one the calculator offers for that date,
    /// and must not collide with one of the identity's existing confirmed
    /// appointments for the same provider, date and time.
    pub async fn create(&self, identity: &str, request: NewAppointment) -> PortResult<Appointment> {
        for (field, value) in [
            ("providerId", &request.provider_id),
            ("providerName", &request.provider_name),
            ("specialty", &request.specialty),
            ("date", &request.date),
            ("timeSlot", &request.time_slot),
        ] {
            if value.trim().is_empty() {
                return Err(PortError::Validation(format!("{} is required", field)));
            }
        }

        let date = slots::parse_date(&request.date)?;
        if self.directory.get(&request.provider_id).is_none() {
            return Err(PortError::NotFound(format!(
                "Provider {} not found",
                request.provider_id
            )));
        }

        let today = Local::now().date_naive();
        let open = slots::day_slots(date, today);
        if !open.contains(&request.time_slot) {
            return Err(PortError::Conflict(format!(
                "{} {} is not a bookable slot",
                request.date, request.time_slot
            )));
        }

        let existing = self.store.list_for(identity).await?;
        let taken = existing.iter().any(|a| {
            a.status == AppointmentStatus::Confirmed
                && a.provider_id == request.provider_id
                && a.date == date
                && a.time_slot == request.time_slot
        });
        if taken {
            return Err(PortError::Conflict(format!(
                "{} {} is already booked with {}",
                request.date, request.time_slot, request.provider_name
            )));
        }

        let appointment = Appointment {
            id: Uuid::new_v4(),
            identity: identity.to_string(),
            provider_id: request.provider_id,
            provider_name: request.provider_name,
            specialty: request.specialty,
            date,
            time_slot: request.time_slot,
            reason: request.reason.filter(|r| !r.trim().is_empty()),
            status: AppointmentStatus::Confirmed,
            created_at: Utc::now(),
        };
        self.store.append(appointment.clone()).await?;
        Ok(appointment)
    }

    /// The identity's appointments in `(date, time_slot, created_at)` order,
    /// hiding cancelled rows unless requested.
    pub async fn list(
        &self,
        identity: &str,
        include_cancelled: bool,
    ) -> PortResult<Vec<Appointment>> {
        let mut rows = self.store.list_for(identity).await?;
        if !include_cancelled {
            rows.retain(|a| a.status != AppointmentStatus::Cancelled);
        }
        rows.sort_by(Appointment::chronological);
        Ok(rows)
    }

    /// Cancels the identity's appointment. Cancelling an already-cancelled
    /// appointment succeeds silently; only existence is checked.
    pub async fn cancel(&self, identity: &str, appointment_id: Uuid) -> PortResult<Appointment> {
        self.store.cancel(identity, appointment_id).await
    }
}
