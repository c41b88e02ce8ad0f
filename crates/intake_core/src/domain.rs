//! crates/intake_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any storage backend or serialization format.

use chrono::{DateTime, NaiveDate, Utc};
use std::cmp::Ordering;
use std::collections::HashMap;
use uuid::Uuid;

/// The payload shape of a single intake step.
///
/// Modeled as a closed tagged union so that illegal field combinations
/// (e.g. answer options on a scale step) cannot be constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepKind {
    /// A one-way message from the assistant; acknowledged with an empty answer.
    Message,
    /// A multiple-choice question with a fixed, ordered set of options.
    Question { options: Vec<String> },
    /// A numeric self-rating captured as the decimal string of an integer
    /// within `[min, max]`.
    Scale { min: i64, max: i64 },
    /// The terminal care recommendation shown once the flow finishes.
    Recommendation {
        severity: String,
        next_steps: Vec<String>,
    },
}

impl StepKind {
    /// The wire/display name of the step kind.
    pub fn name(&self) -> &'static str {
        match self {
            StepKind::Message => "message",
            StepKind::Question { .. } => "question",
            StepKind::Scale { .. } => "scale",
            StepKind::Recommendation { .. } => "recommendation",
        }
    }
}

/// One node in the fixed conversational intake sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeStep {
    pub id: String,
    pub title: String,
    pub message: String,
    pub kind: StepKind,
}

/// The per-identity intake record: every captured answer keyed by step id,
/// plus the moment the flow was completed (absent until then).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntakeRecord {
    pub responses: HashMap<String, String>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// A care provider in the fixed directory. Immutable reference data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provider {
    pub id: String,
    pub name: String,
    pub specialty: String,
    pub credentials: String,
    pub bio: String,
    /// Free-text weekly schedule description. Display only; the slot
    /// calculator does not parse it.
    pub availability: String,
}

/// Lifecycle of an appointment. `Confirmed` may transition once to
/// `Cancelled`; there is no un-cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentStatus {
    Confirmed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn name(&self) -> &'static str {
        match self {
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }
}

/// A booked appointment, owned exclusively by the identity that created it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appointment {
    pub id: Uuid,
    pub identity: String,
    pub provider_id: String,
    pub provider_name: String,
    pub specialty: String,
    pub date: NaiveDate,
    /// Zero-padded 24h start time, e.g. "09:30".
    pub time_slot: String,
    pub reason: Option<String>,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    /// Listing order: `(date, time_slot)` ascending, ties broken by
    /// `created_at` ascending. Zero-padded "HH:MM" strings compare
    /// chronologically under lexicographic order.
    pub fn chronological(a: &Appointment, b: &Appointment) -> Ordering {
        a.date
            .cmp(&b.date)
            .then_with(|| a.time_slot.cmp(&b.time_slot))
            .then_with(|| a.created_at.cmp(&b.created_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn appointment(date: &str, time_slot: &str, created_secs: i64) -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            identity: "patient@demo.test".to_string(),
            provider_id: "p1".to_string(),
            provider_name: "Dr. Example".to_string(),
            specialty: "Therapy".to_string(),
            date: date.parse().unwrap(),
            time_slot: time_slot.to_string(),
            reason: None,
            status: AppointmentStatus::Confirmed,
            created_at: Utc.timestamp_opt(created_secs, 0).unwrap(),
        }
    }

    #[test]
    fn chronological_orders_by_date_then_slot() {
        let mut rows = vec![
            appointment("2025-03-01", "09:00", 0),
            appointment("2025-02-20", "14:00", 0),
            appointment("2025-03-01", "08:00", 0),
        ];
        rows.sort_by(Appointment::chronological);

        let keys: Vec<(String, String)> = rows
            .iter()
            .map(|a| (a.date.to_string(), a.time_slot.clone()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("2025-02-20".to_string(), "14:00".to_string()),
                ("2025-03-01".to_string(), "08:00".to_string()),
                ("2025-03-01".to_string(), "09:00".to_string()),
            ]
        );
    }

    #[test]
    fn chronological_breaks_ties_by_creation_time() {
        let first = appointment("2025-03-01", "09:00", 10);
        let second = appointment("2025-03-01", "09:00", 20);
        assert_eq!(Appointment::chronological(&first, &second), Ordering::Less);
    }
}
