//! crates/intake_core/src/directory.rs
//!
//! The fixed provider roster: lookup by id and a case-insensitive substring
//! filter over specialty and credentials.

use crate::domain::Provider;

/// Immutable provider reference data, fixed at startup. There are no
/// create, update or delete operations.
pub struct ProviderDirectory {
    providers: Vec<Provider>,
}

impl ProviderDirectory {
    pub fn new(providers: Vec<Provider>) -> Self {
        Self { providers }
    }

    /// The demo roster served by the patient-facing application.
    pub fn with_demo_roster() -> Self {
        Self::new(vec![
            provider(
                "dr-amara-okafor",
                "Dr. Amara Okafor",
                "Anxiety and Depression",
                "PhD, Licensed Clinical Psychologist",
                "Dr. Okafor has spent fifteen years helping adults work through \
                 anxiety, depression and life transitions using CBT and ACT.",
                "Monday to Friday, 9am to 5pm",
            ),
            provider(
                "dr-samuel-reyes",
                "Dr. Samuel Reyes",
                "Trauma and PTSD",
                "PsyD, Licensed Clinical Psychologist",
                "Dr. Reyes specializes in trauma-focused care, including EMDR \
                 and prolonged exposure therapy for adults and adolescents.",
                "Monday to Friday, 9am to 5pm",
            ),
            provider(
                "maya-lindqvist",
                "Maya Lindqvist",
                "Stress and Burnout",
                "LCSW, Certified Clinical Trauma Professional",
                "Maya works with professionals navigating chronic stress, \
                 burnout and work-life balance through solution-focused therapy.",
                "Monday to Friday, 9am to 5pm",
            ),
            provider(
                "priya-natarajan",
                "Priya Natarajan",
                "Sleep and Mood Disorders",
                "PMHNP-BC, Psychiatric Nurse Practitioner",
                "Priya provides medication management and supportive counseling \
                 for sleep disturbances, depression and bipolar disorder.",
                "Monday to Friday, 9am to 5pm",
            ),
            provider(
                "jordan-whitfield",
                "Jordan Whitfield",
                "Couples and Family Therapy",
                "LMFT, Licensed Marriage and Family Therapist",
                "Jordan helps couples and families rebuild communication and \
                 trust with emotionally focused therapy.",
                "Monday to Friday, 9am to 5pm",
            ),
        ])
    }

    /// Providers whose specialty or credentials contain `filter`
    /// case-insensitively, in original roster order. An absent or empty
    /// filter returns the whole roster.
    pub fn list(&self, filter: Option<&str>) -> Vec<&Provider> {
        match filter {
            Some(needle) if !needle.is_empty() => {
                let needle = needle.to_lowercase();
                self.providers
                    .iter()
                    .filter(|p| {
                        p.specialty.to_lowercase().contains(&needle)
                            || p.credentials.to_lowercase().contains(&needle)
                    })
                    .collect()
            }
            _ => self.providers.iter().collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Provider> {
        self.providers.iter().find(|p| p.id == id)
    }
}

fn provider(
    id: &str,
    name: &str,
    specialty: &str,
    credentials: &str,
    bio: &str,
    availability: &str,
) -> Provider {
    Provider {
        id: id.to_string(),
        name: name.to_string(),
        specialty: specialty.to_string(),
        credentials: credentials.to_string(),
        bio: bio.to_string(),
        availability: availability.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_or_absent_filter_returns_the_whole_roster() {
        let directory = ProviderDirectory::with_demo_roster();
        let all = directory.list(None);
        assert_eq!(all.len(), 5);
        assert_eq!(directory.list(Some("")).len(), all.len());
    }

    #[test]
    fn filter_matches_specialty_and_credentials_case_insensitively() {
        let directory = ProviderDirectory::with_demo_roster();

        let trauma = directory.list(Some("TRAUMA"));
        // Matches "Trauma and PTSD" (specialty) and the trauma credential.
        assert_eq!(trauma.len(), 2);

        let nurses = directory.list(Some("pmhnp"));
        assert_eq!(nurses.len(), 1);
        assert_eq!(nurses[0].id, "priya-natarajan");
    }

    #[test]
    fn filter_preserves_roster_order() {
        let directory = ProviderDirectory::with_demo_roster();
        let ids: Vec<&str> = directory
            .list(Some("licensed"))
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        let expected: Vec<&str> = directory
            .list(None)
            .iter()
            .filter(|p| p.credentials.to_lowercase().contains("licensed"))
            .map(|p| p.id.as_str())
            .collect();
        assert!(!expected.is_empty());
        assert_eq!(ids, expected);
    }

    #[test]
    fn get_resolves_known_ids_only() {
        let directory = ProviderDirectory::with_demo_roster();
        assert!(directory.get("dr-amara-okafor").is_some());
        assert!(directory.get("unknown").is_none());
    }
}
