//! Profile form state: live fields, validation, submitted snapshot.

use crate::kv::{KvStore, KEY_FULL_NAME, KEY_PROFESSION};
use crate::state::StateEvent;

/// Profile form state
pub struct FormState {
    /// Live form fields, edited every frame
    pub full_name: String,
    pub profession: String,
    /// Field-level validation errors, cleared per field on change
    pub full_name_error: Option<String>,
    pub profession_error: Option<String>,
    /// Snapshot shown once a submission has succeeded
    pub submitted_full_name: String,
    pub submitted_profession: String,
    /// Whether a submission has succeeded, this session or a prior one
    pub submitted: bool,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            profession: String::new(),
            full_name_error: None,
            profession_error: None,
            submitted_full_name: String::new(),
            submitted_profession: String::new(),
            submitted: false,
        }
    }
}

impl FormState {
    /// Restore the submitted snapshot from the key-value layer.
    /// Missing keys are a normal first-run state.
    pub fn load_saved(&mut self, kv: &KvStore) {
        if let Some(name) = kv.get(KEY_FULL_NAME) {
            self.submitted_full_name = name.to_string();
        }
        if let Some(profession) = kv.get(KEY_PROFESSION) {
            self.submitted_profession = profession.to_string();
        }
        if !self.submitted_full_name.is_empty() || !self.submitted_profession.is_empty() {
            self.submitted = true;
            tracing::info!(
                "Restored submitted profile: {} ({})",
                self.submitted_full_name,
                self.submitted_profession
            );
        }
    }

    /// The full name field changed; its error no longer applies
    pub fn full_name_changed(&mut self) {
        self.full_name_error = None;
    }

    /// The profession field changed; its error no longer applies
    pub fn profession_changed(&mut self) {
        self.profession_error = None;
    }

    /// Validate and submit the form.
    ///
    /// On success the submitted snapshot is promoted, both fields are
    /// persisted under their fixed keys and the live fields clear. An invalid
    /// form sets field errors and persists nothing. The two writes are
    /// independent, so a failure between them can leave the stored keys
    /// inconsistent with each other.
    pub fn submit(&mut self, kv: Option<&mut KvStore>) -> Vec<StateEvent> {
        let mut events = Vec::new();
        let mut valid = true;

        if self.full_name.is_empty() {
            self.full_name_error = Some("Full Name is required".to_string());
            valid = false;
        }
        if self.profession.is_empty() {
            self.profession_error = Some("Profession is required".to_string());
            valid = false;
        }
        if !valid {
            return events;
        }

        self.submitted_full_name = self.full_name.clone();
        self.submitted_profession = self.profession.clone();
        self.submitted = true;

        match kv {
            Some(kv) => {
                if let Err(e) = kv.set(KEY_FULL_NAME, &self.full_name) {
                    events.push(StateEvent::LogError(format!(
                        "Failed to persist full name: {e:#}"
                    )));
                }
                if let Err(e) = kv.set(KEY_PROFESSION, &self.profession) {
                    events.push(StateEvent::LogError(format!(
                        "Failed to persist profession: {e:#}"
                    )));
                }
            }
            None => {
                events.push(StateEvent::LogError(
                    "Profile store unavailable; submission not persisted".to_string(),
                ));
            }
        }

        events.push(StateEvent::LogInfo(format!(
            "Profile submitted: {} ({})",
            self.submitted_full_name, self.submitted_profession
        )));
        events.push(StateEvent::StatusMessage("Profile saved".to_string()));

        self.full_name.clear();
        self.profession.clear();

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_kv(dir: &TempDir) -> KvStore {
        KvStore::open(dir.path().join("profile.toml")).unwrap()
    }

    #[test]
    fn empty_form_sets_both_errors_and_persists_nothing() {
        let dir = TempDir::new().unwrap();
        let mut kv = temp_kv(&dir);
        let mut form = FormState::default();

        form.submit(Some(&mut kv));

        assert_eq!(form.full_name_error.as_deref(), Some("Full Name is required"));
        assert_eq!(
            form.profession_error.as_deref(),
            Some("Profession is required")
        );
        assert!(!form.submitted);
        assert_eq!(kv.get(KEY_FULL_NAME), None);
        assert_eq!(kv.get(KEY_PROFESSION), None);
    }

    #[test]
    fn partially_filled_form_is_rejected_whole() {
        let dir = TempDir::new().unwrap();
        let mut kv = temp_kv(&dir);
        let mut form = FormState::default();
        form.full_name = "Ada Lovelace".to_string();

        form.submit(Some(&mut kv));

        assert!(form.full_name_error.is_none());
        assert!(form.profession_error.is_some());
        assert!(!form.submitted);
        // Neither key is written and the typed value is kept for editing
        assert_eq!(kv.get(KEY_FULL_NAME), None);
        assert_eq!(form.full_name, "Ada Lovelace");
    }

    #[test]
    fn valid_submission_promotes_persists_and_clears() {
        let dir = TempDir::new().unwrap();
        let mut kv = temp_kv(&dir);
        let mut form = FormState::default();
        form.full_name = "Ada Lovelace".to_string();
        form.profession = "Mathematician".to_string();

        let events = form.submit(Some(&mut kv));

        assert!(form.submitted);
        assert_eq!(form.submitted_full_name, "Ada Lovelace");
        assert_eq!(form.submitted_profession, "Mathematician");
        assert_eq!(kv.get(KEY_FULL_NAME), Some("Ada Lovelace"));
        assert_eq!(kv.get(KEY_PROFESSION), Some("Mathematician"));
        assert!(form.full_name.is_empty());
        assert!(form.profession.is_empty());
        assert!(events
            .iter()
            .any(|e| matches!(e, StateEvent::StatusMessage(_))));
    }

    #[test]
    fn editing_clears_only_that_fields_error() {
        let mut form = FormState::default();
        form.submit(None);
        assert!(form.full_name_error.is_some());
        assert!(form.profession_error.is_some());

        form.full_name = "A".to_string();
        form.full_name_changed();

        assert!(form.full_name_error.is_none());
        assert!(form.profession_error.is_some());
    }

    #[test]
    fn resubmission_overwrites_previous_snapshot() {
        let dir = TempDir::new().unwrap();
        let mut kv = temp_kv(&dir);
        let mut form = FormState::default();

        form.full_name = "First Name".to_string();
        form.profession = "Artist".to_string();
        form.submit(Some(&mut kv));

        form.full_name = "Second Name".to_string();
        form.profession = "Sculptor".to_string();
        form.submit(Some(&mut kv));

        assert_eq!(form.submitted_full_name, "Second Name");
        assert_eq!(kv.get(KEY_FULL_NAME), Some("Second Name"));
        assert_eq!(kv.get(KEY_PROFESSION), Some("Sculptor"));
    }

    #[test]
    fn restart_restores_submission() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("profile.toml");
        {
            let mut kv = KvStore::open(&path).unwrap();
            let mut form = FormState::default();
            form.full_name = "Grace Hopper".to_string();
            form.profession = "Rear Admiral".to_string();
            form.submit(Some(&mut kv));
        }

        let kv = KvStore::open(&path).unwrap();
        let mut form = FormState::default();
        form.load_saved(&kv);

        assert!(form.submitted);
        assert_eq!(form.submitted_full_name, "Grace Hopper");
        assert_eq!(form.submitted_profession, "Rear Admiral");
    }

    #[test]
    fn fresh_store_restores_nothing() {
        let dir = TempDir::new().unwrap();
        let kv = temp_kv(&dir);
        let mut form = FormState::default();
        form.load_saved(&kv);
        assert!(!form.submitted);
    }
}
