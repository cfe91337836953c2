use std::sync::Arc;

use crate::errors::BookingError;
use crate::models::{
    AppointmentDraft, Credentials, DateOption, NewAppointment, ProfessionalProfile, Service,
    SlotGroup, APPOINTMENT_ORIGIN,
};
use crate::services::dates::{build_date_options, combine_date_time};
use crate::services::generation::{Generation, ProfessionalQuery, SlotQuery};
use crate::services::slots::group_slots_by_period;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Service,
    Schedule,
    Professional,
    Confirm,
}

/// Drives service → date → time → professional → confirm, mirroring every
/// selection into the draft store.
///
/// Fetches are split into `begin_*` (issues a query tagged with a generation)
/// and `apply_*` (drops results whose generation is no longer current), so a
/// response for a date or service the user has since moved away from never
/// overwrites newer state. `load_*` runs both halves in sequence.
pub struct BookingWizard {
    state: Arc<AppState>,
    date_options: Vec<DateOption>,
    service: Option<Service>,
    selected_date: String,
    selected_time: Option<String>,
    slots: Vec<String>,
    slot_groups: Vec<SlotGroup>,
    slots_generation: Generation,
    professionals: Vec<ProfessionalProfile>,
    selected_professional: Option<ProfessionalProfile>,
    // Draft professional to re-select once the list for its service arrives.
    pending_professional_id: Option<i64>,
    professionals_generation: Generation,
}

impl BookingWizard {
    pub fn new(state: Arc<AppState>) -> Self {
        let options = build_date_options(state.config.date_window_days);
        Self::with_date_options(state, options)
    }

    pub fn with_date_options(state: Arc<AppState>, date_options: Vec<DateOption>) -> Self {
        let selected_date = date_options
            .first()
            .map(|o| o.key.clone())
            .unwrap_or_default();

        Self {
            state,
            date_options,
            service: None,
            selected_date,
            selected_time: None,
            slots: Vec::new(),
            slot_groups: Vec::new(),
            slots_generation: Generation::default(),
            professionals: Vec::new(),
            selected_professional: None,
            pending_professional_id: None,
            professionals_generation: Generation::default(),
        }
    }

    // ── Accessors ──

    pub fn step(&self) -> WizardStep {
        if self.service.is_none() {
            WizardStep::Service
        } else if self.selected_time.is_none() {
            WizardStep::Schedule
        } else if self.selected_professional.is_none() {
            WizardStep::Professional
        } else {
            WizardStep::Confirm
        }
    }

    pub fn date_options(&self) -> &[DateOption] {
        &self.date_options
    }

    pub fn service(&self) -> Option<&Service> {
        self.service.as_ref()
    }

    pub fn selected_date(&self) -> &str {
        &self.selected_date
    }

    pub fn selected_time(&self) -> Option<&str> {
        self.selected_time.as_deref()
    }

    pub fn slots(&self) -> &[String] {
        &self.slots
    }

    pub fn slot_groups(&self) -> &[SlotGroup] {
        &self.slot_groups
    }

    pub fn professionals(&self) -> &[ProfessionalProfile] {
        &self.professionals
    }

    pub fn selected_professional(&self) -> Option<&ProfessionalProfile> {
        self.selected_professional.as_ref()
    }

    /// The booking as currently selected on screen.
    pub fn current_draft(&self) -> AppointmentDraft {
        let mut draft = self
            .service
            .as_ref()
            .map(AppointmentDraft::for_service)
            .unwrap_or_default();
        draft.date = Some(self.selected_date.clone()).filter(|d| !d.is_empty());
        draft.time = self.selected_time.clone();
        draft.set_professional(self.selected_professional.as_ref());
        draft
    }

    // ── Service ──

    /// Starts (or restarts) the flow for `service`. A stored draft for the same
    /// service restores its date, time and professional; a draft for another
    /// service is replaced.
    pub fn select_service(&mut self, service: Service) {
        let stored = self
            .state
            .drafts
            .load()
            .filter(|d| d.service_id == Some(service.id));

        let same_service = self.service.as_ref().map(|s| s.id) == Some(service.id);
        if !same_service {
            self.reset_for_service_change();
        }

        if let Some(draft) = &stored {
            if let Some(date) = draft.date.as_deref().filter(|d| self.in_window(d)) {
                self.selected_date = date.to_string();
                self.selected_time = draft.time.clone();
            }
            if self.selected_professional.is_none() {
                self.pending_professional_id = draft.professional_id;
            }
        }

        self.service = Some(service);
        self.persist();
    }

    fn reset_for_service_change(&mut self) {
        self.selected_time = None;
        self.slots.clear();
        self.slot_groups.clear();
        self.professionals.clear();
        self.selected_professional = None;
        self.pending_professional_id = None;
        self.slots_generation.advance();
        self.professionals_generation.advance();
    }

    // ── Date / time ──

    /// Switches the visible day. Changing the day drops the selected time.
    pub fn select_date(&mut self, key: &str) -> Result<SlotQuery, BookingError> {
        if self.service.is_none() {
            return Err(BookingError::IncompleteBooking);
        }
        if !self.in_window(key) {
            return Err(BookingError::UnavailableSelection(format!(
                "date {key} is outside the booking window"
            )));
        }

        if key != self.selected_date {
            self.selected_date = key.to_string();
            self.selected_time = None;
            self.slots.clear();
            self.slot_groups.clear();
            self.persist();
        }

        self.begin_slot_fetch()
    }

    pub fn begin_slot_fetch(&mut self) -> Result<SlotQuery, BookingError> {
        let service_id = self
            .service
            .as_ref()
            .map(|s| s.id)
            .ok_or(BookingError::IncompleteBooking)?;

        Ok(SlotQuery {
            generation: self.slots_generation.advance(),
            date: self.selected_date.clone(),
            service_id,
        })
    }

    /// Returns `Ok(false)` when the result belonged to a superseded query.
    pub fn apply_slots(
        &mut self,
        query: &SlotQuery,
        result: Result<Vec<String>, BookingError>,
    ) -> Result<bool, BookingError> {
        if !self.slots_generation.is_current(query.generation) {
            tracing::debug!(date = %query.date, "discarding stale slots result");
            return Ok(false);
        }

        match result {
            Ok(slots) => {
                self.slot_groups = group_slots_by_period(&slots);
                self.slots = slots;

                let still_offered = self
                    .selected_time
                    .as_ref()
                    .map_or(true, |t| self.slots.contains(t));
                if !still_offered {
                    self.selected_time = None;
                    self.persist();
                }
                Ok(true)
            }
            Err(e) => {
                self.slots.clear();
                self.slot_groups.clear();
                Err(e)
            }
        }
    }

    pub async fn load_slots(&mut self) -> Result<&[SlotGroup], BookingError> {
        let query = self.begin_slot_fetch()?;
        let result = self
            .state
            .api
            .available_times(&query.date, query.service_id)
            .await;
        self.apply_slots(&query, result)?;
        Ok(&self.slot_groups)
    }

    pub fn select_time(&mut self, time: &str) -> Result<(), BookingError> {
        if !self.slots.iter().any(|s| s == time) {
            return Err(BookingError::UnavailableSelection(format!(
                "time {time} is not offered on {}",
                self.selected_date
            )));
        }
        self.selected_time = Some(time.to_string());
        self.persist();
        Ok(())
    }

    // ── Professional ──

    pub fn begin_professional_fetch(&mut self) -> Result<ProfessionalQuery, BookingError> {
        let service_id = self
            .service
            .as_ref()
            .map(|s| s.id)
            .ok_or(BookingError::IncompleteBooking)?;

        Ok(ProfessionalQuery {
            generation: self.professionals_generation.advance(),
            service_id,
        })
    }

    pub fn apply_professionals(
        &mut self,
        query: &ProfessionalQuery,
        result: Result<Vec<ProfessionalProfile>, BookingError>,
    ) -> Result<bool, BookingError> {
        if !self.professionals_generation.is_current(query.generation) {
            tracing::debug!(service_id = query.service_id, "discarding stale professionals result");
            return Ok(false);
        }

        let professionals = match result {
            Ok(list) => list,
            Err(e) => {
                self.professionals.clear();
                return Err(e);
            }
        };

        let wanted = self
            .selected_professional
            .as_ref()
            .map(|p| p.id)
            .or(self.pending_professional_id.take());
        self.selected_professional =
            wanted.and_then(|id| professionals.iter().find(|p| p.id == id).cloned());
        self.professionals = professionals;
        self.persist();
        Ok(true)
    }

    pub async fn load_professionals(&mut self) -> Result<&[ProfessionalProfile], BookingError> {
        let query = self.begin_professional_fetch()?;
        let result = self.state.api.professionals(query.service_id).await;
        self.apply_professionals(&query, result)?;
        Ok(&self.professionals)
    }

    pub fn select_professional(&mut self, professional_id: i64) -> Result<(), BookingError> {
        let professional = self
            .professionals
            .iter()
            .find(|p| p.id == professional_id)
            .cloned()
            .ok_or_else(|| {
                BookingError::UnavailableSelection(format!(
                    "professional {professional_id} does not offer this service"
                ))
            })?;
        self.selected_professional = Some(professional);
        self.persist();
        Ok(())
    }

    // ── Confirm ──

    /// Submits the booking. Incomplete selections and missing sessions are
    /// rejected before any request; the draft is cleared once the backend accepts.
    pub async fn confirm(
        &mut self,
        credentials: &mut Credentials,
    ) -> Result<serde_json::Value, BookingError> {
        let appointment = build_new_appointment(&self.current_draft())?;

        if !credentials.is_authenticated() {
            return Err(BookingError::SessionExpired);
        }

        let created = self
            .state
            .api
            .create_appointment(&appointment, credentials)
            .await?;

        tracing::info!(
            service_id = appointment.service_id,
            professional = appointment.professional,
            date_time = %appointment.date_time,
            "appointment created"
        );

        self.state.drafts.clear();
        Ok(created)
    }

    // ── Helpers ──

    fn in_window(&self, key: &str) -> bool {
        self.date_options.iter().any(|o| o.key == key)
    }

    fn persist(&self) {
        let Some(service) = &self.service else {
            return;
        };
        let date = Some(self.selected_date.clone()).filter(|d| !d.is_empty());
        let time = self.selected_time.clone();
        let professional = self.selected_professional.clone();
        let pending = self.pending_professional_id;

        self.state.drafts.update(|draft| {
            draft.service_id = Some(service.id);
            draft.service_name = Some(service.name.clone());
            draft.service_price = Some(service.price.clone());
            draft.date = date;
            draft.time = time;
            match (&professional, pending) {
                (Some(p), _) => draft.set_professional(Some(p)),
                // Keep the stored pick until the professionals list confirms it.
                (None, Some(_)) => {}
                (None, None) => draft.set_professional(None),
            }
        });
    }
}

/// Turns a complete draft into the create-appointment body.
pub fn build_new_appointment(draft: &AppointmentDraft) -> Result<NewAppointment, BookingError> {
    let (Some(service_id), Some(date), Some(time), Some(professional)) = (
        draft.service_id,
        draft.date.as_deref(),
        draft.time.as_deref(),
        draft.professional_id,
    ) else {
        return Err(BookingError::IncompleteBooking);
    };

    Ok(NewAppointment {
        service_id,
        date_time: combine_date_time(date, time)?,
        professional,
        appointment_origin: APPOINTMENT_ORIGIN.to_string(),
    })
}
