//! crates/intake_core/src/steps.rs
//!
//! The conversational intake flow: a fixed, ordered step sequence and the
//! engine that walks a user through it one answer at a time.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::{IntakeStep, StepKind};
use crate::ports::{IntakeStore, PortError, PortResult};

//=========================================================================================
// The Fixed Step Sequence
//=========================================================================================

/// Builds the demo intake sequence.
///
/// The sequence is immutable once built and linearly ordered; the terminal
/// element is always the care recommendation.
pub fn demo_steps() -> Vec<IntakeStep> {
    vec![
        step(
            "welcome",
            "Welcome",
            "Hi, I'm here to help you get started. I'll ask a few short questions \
             about how you've been feeling so we can point you to the right care.",
            StepKind::Message,
        ),
        step(
            "main-concern",
            "What brings you here",
            "What's been on your mind lately?",
            StepKind::Question {
                options: strings(&[
                    "Feeling anxious or on edge",
                    "Feeling down or low",
                    "Trouble sleeping",
                    "Stress at work or school",
                    "Something else",
                ]),
            },
        ),
        step(
            "duration",
            "How long",
            "How long have you been feeling this way?",
            StepKind::Question {
                options: strings(&[
                    "Less than 2 weeks",
                    "2 to 4 weeks",
                    "1 to 6 months",
                    "More than 6 months",
                ]),
            },
        ),
        step(
            "mood-scale",
            "Mood check",
            "On a scale of 1 to 10, how would you rate your overall mood this past week?",
            StepKind::Scale { min: 1, max: 10 },
        ),
        step(
            "sleep",
            "Sleep",
            "How often are you sleeping through the night?",
            StepKind::Question {
                options: strings(&[
                    "Most nights",
                    "A few nights a week",
                    "Rarely",
                    "Almost never",
                ]),
            },
        ),
        step(
            "daily-impact",
            "Daily life",
            "How much is this getting in the way of your day-to-day activities?",
            StepKind::Question {
                options: strings(&["Not much", "Somewhat", "Quite a bit", "Nearly every day"]),
            },
        ),
        step(
            "support",
            "Support",
            "Do you have people around you that you can talk to when things get hard?",
            StepKind::Question {
                options: strings(&["Yes, regularly", "Sometimes", "Not really"]),
            },
        ),
        step(
            "wrap-up",
            "Almost done",
            "Thank you for sharing all of that. It takes courage. Let me put together \
             a suggestion based on what you've told me.",
            StepKind::Message,
        ),
        step(
            "recommendation",
            "Your care suggestion",
            "Based on your answers, talking with a licensed therapist could be a good \
             next step. You can review your care summary and book an initial \
             consultation whenever you're ready.",
            StepKind::Recommendation {
                severity: "moderate".to_string(),
                next_steps: strings(&[
                    "Review your care summary",
                    "Browse our provider directory",
                    "Book an initial consultation",
                ]),
            },
        ),
    ]
}

fn step(id: &str, title: &str, message: &str, kind: StepKind) -> IntakeStep {
    IntakeStep {
        id: id.to_string(),
        title: title.to_string(),
        message: message.to_string(),
        kind,
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

//=========================================================================================
// The Intake Flow Engine
//=========================================================================================

/// Drives one identity through the step sequence, recording an answer per
/// visited step and persisting the accumulated map after every accepted
/// answer.
///
/// Positions are integer states `0..len-1`; transitions are strictly `+1`
/// per accepted answer and never advance past the terminal step.
pub struct IntakeFlow {
    steps: Arc<Vec<IntakeStep>>,
    store: Arc<dyn IntakeStore>,
    identity: String,
    position: usize,
    responses: HashMap<String, String>,
}

impl IntakeFlow {
    pub fn new(steps: Arc<Vec<IntakeStep>>, store: Arc<dyn IntakeStore>, identity: &str) -> Self {
        Self {
            steps,
            store,
            identity: identity.to_string(),
            position: 0,
            responses: HashMap::new(),
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// The step at `position`, or `Validation` if the position is outside
    /// the sequence.
    pub fn current_step(&self, position: usize) -> PortResult<&IntakeStep> {
        self.steps.get(position).ok_or_else(|| {
            PortError::Validation(format!(
                "step position {} is out of range (0..{})",
                position,
                self.steps.len()
            ))
        })
    }

    /// Records `answer` for the step at `position` and advances.
    ///
    /// The answer is stored under the step id, the full accumulated map is
    /// persisted, and the returned position is `position + 1` clamped to the
    /// terminal step. The record is marked completed on the call that
    /// transitions into (or re-answers) the terminal recommendation step.
    pub async fn submit_answer(
        &mut self,
        position: usize,
        step_id: &str,
        answer: &str,
    ) -> PortResult<usize> {
        {
            let step = self.current_step(position)?;
            if step.id != step_id {
                return Err(PortError::Validation(format!(
                    "step id '{}' does not match the step at position {}",
                    step_id, position
                )));
            }
            validate_answer(step, answer)?;
        }

        self.responses.insert(step_id.to_string(), answer.to_string());

        let last = self.steps.len() - 1;
        let completed = position + 1 >= last;
        self.store
            .save_record(&self.identity, self.responses.clone(), completed)
            .await?;

        self.position = (position + 1).min(last);
        Ok(self.position)
    }

    /// Returns to the first step, clearing every recorded answer and the
    /// stored completion timestamp.
    pub async fn restart(&mut self) -> PortResult<usize> {
        self.responses.clear();
        self.store
            .save_record(&self.identity, HashMap::new(), false)
            .await?;
        self.position = 0;
        Ok(self.position)
    }
}

/// Server-side answer validation.
///
/// Scale answers must be the decimal string of an integer within the step's
/// range. Message and recommendation steps accept an empty acknowledge
/// answer; question answers are recorded verbatim.
fn validate_answer(step: &IntakeStep, answer: &str) -> PortResult<()> {
    if let StepKind::Scale { min, max } = step.kind {
        let value: i64 = answer.trim().parse().map_err(|_| {
            PortError::Validation(format!(
                "answer for step '{}' must be a whole number",
                step.id
            ))
        })?;
        if value < min || value > max {
            return Err(PortError::Validation(format!(
                "answer for step '{}' must be between {} and {}",
                step.id, min, max
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::IntakeRecord;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;

    /// Minimal in-memory store with the save semantics of the real adapter.
    #[derive(Default)]
    struct FakeStore {
        record: Mutex<Option<IntakeRecord>>,
    }

    #[async_trait]
    impl IntakeStore for FakeStore {
        async fn save_record(
            &self,
            _identity: &str,
            responses: HashMap<String, String>,
            completed: bool,
        ) -> PortResult<()> {
            let mut slot = self.record.lock().unwrap();
            let prior = slot.take().unwrap_or_default();
            let completed_at = if completed {
                prior.completed_at.or_else(|| Some(Utc::now()))
            } else if responses.is_empty() {
                None
            } else {
                prior.completed_at
            };
            *slot = Some(IntakeRecord {
                responses,
                completed_at,
            });
            Ok(())
        }

        async fn load_record(&self, _identity: &str) -> PortResult<Option<IntakeRecord>> {
            Ok(self.record.lock().unwrap().clone())
        }
    }

    fn flow_with_store() -> (IntakeFlow, Arc<FakeStore>) {
        let store = Arc::new(FakeStore::default());
        let flow = IntakeFlow::new(
            Arc::new(demo_steps()),
            store.clone(),
            "patient@demo.test",
        );
        (flow, store)
    }

    /// A valid answer for whatever kind the step is.
    fn answer_for(step: &IntakeStep) -> String {
        match &step.kind {
            StepKind::Message | StepKind::Recommendation { .. } => String::new(),
            StepKind::Question { options } => options[0].clone(),
            StepKind::Scale { min, .. } => min.to_string(),
        }
    }

    #[test]
    fn terminal_step_is_a_recommendation() {
        let steps = demo_steps();
        assert!(matches!(
            steps.last().unwrap().kind,
            StepKind::Recommendation { .. }
        ));
    }

    #[tokio::test]
    async fn advances_one_step_per_answer_and_never_past_the_end() {
        let (mut flow, _store) = flow_with_store();
        let steps = demo_steps();
        let last = steps.len() - 1;

        for (i, step) in steps.iter().enumerate().take(last) {
            let next = flow
                .submit_answer(i, &step.id, &answer_for(step))
                .await
                .unwrap();
            assert_eq!(next, i + 1);
        }
        assert_eq!(flow.position(), last);

        // Answering the terminal step stays on it.
        let terminal = &steps[last];
        let next = flow.submit_answer(last, &terminal.id, "").await.unwrap();
        assert_eq!(next, last);
    }

    #[tokio::test]
    async fn completion_triggers_exactly_on_the_second_to_last_answer() {
        let (mut flow, store) = flow_with_store();
        let steps = demo_steps();
        let last = steps.len() - 1;

        for (i, step) in steps.iter().enumerate().take(last - 1) {
            flow.submit_answer(i, &step.id, &answer_for(step))
                .await
                .unwrap();
            let record = store.load_record("patient@demo.test").await.unwrap().unwrap();
            assert!(
                record.completed_at.is_none(),
                "must not complete before position {}",
                last - 1
            );
        }

        let penultimate = &steps[last - 1];
        flow.submit_answer(last - 1, &penultimate.id, &answer_for(penultimate))
            .await
            .unwrap();
        let record = store.load_record("patient@demo.test").await.unwrap().unwrap();
        assert!(record.completed_at.is_some());
    }

    #[tokio::test]
    async fn restart_clears_responses_and_completion() {
        let (mut flow, store) = flow_with_store();
        let steps = demo_steps();
        for (i, step) in steps.iter().enumerate().take(steps.len() - 1) {
            flow.submit_answer(i, &step.id, &answer_for(step))
                .await
                .unwrap();
        }

        let position = flow.restart().await.unwrap();
        assert_eq!(position, 0);

        let record = store.load_record("patient@demo.test").await.unwrap().unwrap();
        assert!(record.responses.is_empty());
        assert!(record.completed_at.is_none());
    }

    #[tokio::test]
    async fn rejects_mismatched_step_id_and_out_of_range_position() {
        let (mut flow, _store) = flow_with_store();
        let err = flow.submit_answer(0, "main-concern", "").await.unwrap_err();
        assert!(matches!(err, PortError::Validation(_)));

        let err = flow.current_step(99).unwrap_err();
        assert!(matches!(err, PortError::Validation(_)));
        assert_eq!(flow.position(), 0);
    }

    #[tokio::test]
    async fn scale_answers_are_range_checked() {
        let (mut flow, _store) = flow_with_store();
        let steps = demo_steps();
        let scale_pos = steps
            .iter()
            .position(|s| matches!(s.kind, StepKind::Scale { .. }))
            .unwrap();

        for (i, step) in steps.iter().enumerate().take(scale_pos) {
            flow.submit_answer(i, &step.id, &answer_for(step))
                .await
                .unwrap();
        }

        let scale = &steps[scale_pos];
        for bad in ["0", "11", "seven", ""] {
            let err = flow.submit_answer(scale_pos, &scale.id, bad).await.unwrap_err();
            assert!(matches!(err, PortError::Validation(_)), "accepted '{}'", bad);
            assert_eq!(flow.position(), scale_pos);
        }

        let next = flow.submit_answer(scale_pos, &scale.id, "7").await.unwrap();
        assert_eq!(next, scale_pos + 1);
    }

    #[tokio::test]
    async fn resubmitting_a_step_overwrites_the_answer() {
        let (mut flow, store) = flow_with_store();
        let steps = demo_steps();
        let question = &steps[1];

        flow.submit_answer(0, &steps[0].id, "").await.unwrap();
        flow.submit_answer(1, &question.id, "Trouble sleeping")
            .await
            .unwrap();
        flow.submit_answer(1, &question.id, "Something else")
            .await
            .unwrap();

        let record = store.load_record("patient@demo.test").await.unwrap().unwrap();
        assert_eq!(
            record.responses.get(&question.id).map(String::as_str),
            Some("Something else")
        );
    }
}
