//! services/api/src/adapters/memory.rs
//!
//! This module contains the in-memory store adapter, which is the concrete
//! implementation of the `IntakeStore`, `AppointmentStore` and `SessionStore`
//! ports from the `core` crate. State lives for the lifetime of the process
//! and is cleared on restart.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use intake_core::domain::{Appointment, AppointmentStatus, IntakeRecord};
use intake_core::ports::{
    AppointmentStore, IntakeStore, PortError, PortResult, SessionStore,
};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A browser login session held in memory.
struct SessionEntry {
    identity: String,
    expires_at: DateTime<Utc>,
}

/// A process-local store adapter backing all three store ports.
///
/// Every mutation takes the write lock, so read-modify-write sequences for
/// an identity are serialized: the last full write wins and no update is
/// lost under concurrent requests.
#[derive(Default)]
pub struct MemoryStore {
    intakes: RwLock<HashMap<String, IntakeRecord>>,
    appointments: RwLock<HashMap<String, Vec<Appointment>>>,
    sessions: RwLock<HashMap<String, SessionEntry>>,
}

impl MemoryStore {
    /// Creates a new, empty `MemoryStore`.
    pub fn new() -> Self {
        Self::default()
    }
}

//=========================================================================================
// `IntakeStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl IntakeStore for MemoryStore {
    async fn save_record(
        &self,
        identity: &str,
        responses: HashMap<String, String>,
        completed: bool,
    ) -> PortResult<()> {
        let mut intakes = self.intakes.write().await;
        let record = intakes.entry(identity.to_string()).or_default();

        // An empty-map save is how a restart is expressed; it also clears
        // the completion timestamp. A completing save stamps it once.
        if completed {
            record.completed_at.get_or_insert_with(Utc::now);
        } else if responses.is_empty() {
            record.completed_at = None;
        }
        record.responses = responses;
        Ok(())
    }

    async fn load_record(&self, identity: &str) -> PortResult<Option<IntakeRecord>> {
        Ok(self.intakes.read().await.get(identity).cloned())
    }
}

//=========================================================================================
// `AppointmentStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl AppointmentStore for MemoryStore {
    async fn append(&self, appointment: Appointment) -> PortResult<()> {
        self.appointments
            .write()
            .await
            .entry(appointment.identity.clone())
            .or_default()
            .push(appointment);
        Ok(())
    }

    async fn list_for(&self, identity: &str) -> PortResult<Vec<Appointment>> {
        Ok(self
            .appointments
            .read()
            .await
            .get(identity)
            .cloned()
            .unwrap_or_default())
    }

    async fn cancel(&self, identity: &str, appointment_id: Uuid) -> PortResult<Appointment> {
        let mut appointments = self.appointments.write().await;
        let row = appointments
            .get_mut(identity)
            .and_then(|rows| rows.iter_mut().find(|a| a.id == appointment_id))
            .ok_or_else(|| {
                PortError::NotFound(format!("Appointment {} not found", appointment_id))
            })?;
        row.status = AppointmentStatus::Cancelled;
        Ok(row.clone())
    }
}

//=========================================================================================
// `SessionStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl SessionStore for MemoryStore {
    async fn create_session(
        &self,
        identity: &str,
        expires_at: DateTime<Utc>,
    ) -> PortResult<String> {
        let token = Uuid::new_v4().to_string();
        self.sessions.write().await.insert(
            token.clone(),
            SessionEntry {
                identity: identity.to_string(),
                expires_at,
            },
        );
        Ok(token)
    }

    async fn resolve_session(&self, token: &str) -> PortResult<String> {
        let sessions = self.sessions.read().await;
        let entry = sessions.get(token).ok_or(PortError::Unauthorized)?;
        if entry.expires_at <= Utc::now() {
            return Err(PortError::Unauthorized);
        }
        Ok(entry.identity.clone())
    }

    async fn delete_session(&self, token: &str) -> PortResult<()> {
        self.sessions.write().await.remove(token);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn responses(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn appointment(identity: &str, date: &str, time_slot: &str) -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            identity: identity.to_string(),
            provider_id: "dr-amara-okafor".to_string(),
            provider_name: "Dr. Amara Okafor".to_string(),
            specialty: "Anxiety and Depression".to_string(),
            date: date.parse().unwrap(),
            time_slot: time_slot.to_string(),
            reason: None,
            status: AppointmentStatus::Confirmed,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn save_and_load_round_trip_preserves_the_map() {
        let store = MemoryStore::new();
        let map = responses(&[("a", "1"), ("b", "2")]);

        store.save_record("x@test", map.clone(), false).await.unwrap();
        let record = store.load_record("x@test").await.unwrap().unwrap();
        assert_eq!(record.responses, map);
        assert!(record.completed_at.is_none());
    }

    #[tokio::test]
    async fn completion_is_stamped_once_and_survives_later_saves() {
        let store = MemoryStore::new();
        store
            .save_record("x@test", responses(&[("a", "1")]), true)
            .await
            .unwrap();
        let stamped = store
            .load_record("x@test")
            .await
            .unwrap()
            .unwrap()
            .completed_at
            .unwrap();

        // A later non-completing save with content keeps the timestamp.
        store
            .save_record("x@test", responses(&[("a", "1"), ("b", "2")]), false)
            .await
            .unwrap();
        let record = store.load_record("x@test").await.unwrap().unwrap();
        assert_eq!(record.completed_at, Some(stamped));

        // A repeat completing save does not move it.
        store
            .save_record("x@test", responses(&[("a", "1")]), true)
            .await
            .unwrap();
        let record = store.load_record("x@test").await.unwrap().unwrap();
        assert_eq!(record.completed_at, Some(stamped));
    }

    #[tokio::test]
    async fn an_empty_save_clears_responses_and_completion() {
        let store = MemoryStore::new();
        store
            .save_record("x@test", responses(&[("a", "1")]), true)
            .await
            .unwrap();

        store.save_record("x@test", HashMap::new(), false).await.unwrap();
        let record = store.load_record("x@test").await.unwrap().unwrap();
        assert!(record.responses.is_empty());
        assert!(record.completed_at.is_none());
    }

    #[tokio::test]
    async fn loading_an_unknown_identity_is_a_tolerant_none() {
        let store = MemoryStore::new();
        assert!(store.load_record("nobody@test").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn cancelling_leaves_sibling_appointments_untouched() {
        let store = MemoryStore::new();
        let keep = appointment("x@test", "2027-03-01", "09:00");
        let drop = appointment("x@test", "2027-03-01", "10:00");
        store.append(keep.clone()).await.unwrap();
        store.append(drop.clone()).await.unwrap();

        store.cancel("x@test", drop.id).await.unwrap();

        let rows = store.list_for("x@test").await.unwrap();
        let kept = rows.iter().find(|a| a.id == keep.id).unwrap();
        assert_eq!(kept.status, AppointmentStatus::Confirmed);
        let cancelled = rows.iter().find(|a| a.id == drop.id).unwrap();
        assert_eq!(cancelled.status, AppointmentStatus::Cancelled);
    }

    #[tokio::test]
    async fn appointments_are_isolated_per_identity() {
        let store = MemoryStore::new();
        let mine = appointment("x@test", "2027-03-01", "09:00");
        store.append(mine.clone()).await.unwrap();

        assert!(store.list_for("y@test").await.unwrap().is_empty());
        let err = store.cancel("y@test", mine.id).await.unwrap_err();
        assert!(matches!(err, PortError::NotFound(_)));
    }

    #[tokio::test]
    async fn sessions_resolve_until_deleted_or_expired() {
        let store = MemoryStore::new();
        let token = store
            .create_session("x@test", Utc::now() + Duration::days(30))
            .await
            .unwrap();
        assert_eq!(store.resolve_session(&token).await.unwrap(), "x@test");

        store.delete_session(&token).await.unwrap();
        assert!(matches!(
            store.resolve_session(&token).await.unwrap_err(),
            PortError::Unauthorized
        ));

        let stale = store
            .create_session("x@test", Utc::now() - Duration::minutes(1))
            .await
            .unwrap();
        assert!(matches!(
            store.resolve_session(&stale).await.unwrap_err(),
            PortError::Unauthorized
        ));
    }
}
