use std::sync::Arc;

use crate::models::AppointmentDraft;
use crate::services::storage::KeyValueStore;

pub const DRAFT_KEY: &str = "appointmentDraft";

/// Single-slot persistence for the in-progress booking.
///
/// Last write wins. Storage failures never surface: a missing backend, a read
/// error or unparseable content all load as "no draft", and writes become no-ops.
#[derive(Clone)]
pub struct DraftStore {
    store: Option<Arc<dyn KeyValueStore>>,
}

impl DraftStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store: Some(store) }
    }

    /// A store with no backend; loads nothing and drops every write.
    pub fn detached() -> Self {
        Self { store: None }
    }

    pub fn save(&self, draft: &AppointmentDraft) {
        let Some(store) = &self.store else {
            return;
        };

        let raw = match serde_json::to_string(draft) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize appointment draft");
                return;
            }
        };

        if let Err(e) = store.set(DRAFT_KEY, &raw) {
            tracing::warn!(error = %e, "failed to save appointment draft");
        }
    }

    pub fn load(&self) -> Option<AppointmentDraft> {
        let store = self.store.as_ref()?;

        let raw = match store.get(DRAFT_KEY) {
            Ok(Some(raw)) if !raw.is_empty() => raw,
            Ok(_) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read appointment draft");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(draft) => Some(draft),
            Err(e) => {
                tracing::warn!(error = %e, "discarding unparseable appointment draft");
                None
            }
        }
    }

    /// Read the current draft (or an empty one), apply `f`, write it back whole.
    pub fn update<F>(&self, f: F) -> AppointmentDraft
    where
        F: FnOnce(&mut AppointmentDraft),
    {
        let mut draft = self.load().unwrap_or_default();
        f(&mut draft);
        self.save(&draft);
        draft
    }

    pub fn clear(&self) {
        if let Some(store) = &self.store {
            if let Err(e) = store.clear(DRAFT_KEY) {
                tracing::warn!(error = %e, "failed to clear appointment draft");
            }
        }
    }
}
