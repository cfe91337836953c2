use std::sync::Arc;

use crate::errors::BookingError;
use crate::models::{
    AppointmentPatch, Credentials, NextAppointment, ProfessionalProfile, Service, SlotGroup,
};
use crate::services::dates::{combine_date_time, split_date_time};
use crate::services::generation::{Generation, ProfessionalQuery, SlotQuery};
use crate::services::slots::group_slots_by_period;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditStep {
    Service,
    Time,
    Professional,
}

/// Reschedule/reassign flow for an existing appointment.
///
/// The day stays fixed; service, time and professional may change. Only the
/// fields that differ from the original are sent.
pub struct EditSession {
    state: Arc<AppState>,
    appointment_id: i64,
    services: Vec<Service>,
    initial_service_id: Option<i64>,
    initial_date: String,
    initial_time: String,
    initial_professional_id: Option<i64>,
    step: EditStep,
    selected_service_id: Option<i64>,
    selected_time: Option<String>,
    selected_professional: Option<ProfessionalProfile>,
    slots: Vec<String>,
    slot_groups: Vec<SlotGroup>,
    slots_generation: Generation,
    professionals: Vec<ProfessionalProfile>,
    professionals_generation: Generation,
}

impl EditSession {
    pub fn new(
        state: Arc<AppState>,
        appointment: &NextAppointment,
        services: Vec<Service>,
    ) -> Result<Self, BookingError> {
        let (initial_date, initial_time) = split_date_time(&appointment.date_time)?;
        let initial_service_id = initial_service_id(appointment, &services);

        Ok(Self {
            state,
            appointment_id: appointment.id,
            services,
            initial_service_id,
            initial_date,
            initial_time: initial_time.clone(),
            initial_professional_id: appointment.professional,
            step: EditStep::Service,
            selected_service_id: initial_service_id,
            selected_time: Some(initial_time),
            selected_professional: None,
            slots: Vec::new(),
            slot_groups: Vec::new(),
            slots_generation: Generation::default(),
            professionals: Vec::new(),
            professionals_generation: Generation::default(),
        })
    }

    pub fn step(&self) -> EditStep {
        self.step
    }

    pub fn date(&self) -> &str {
        &self.initial_date
    }

    pub fn selected_service(&self) -> Option<&Service> {
        let id = self.selected_service_id?;
        self.services.iter().find(|s| s.id == id)
    }

    pub fn selected_time(&self) -> Option<&str> {
        self.selected_time.as_deref()
    }

    pub fn selected_professional(&self) -> Option<&ProfessionalProfile> {
        self.selected_professional.as_ref()
    }

    pub fn slot_groups(&self) -> &[SlotGroup] {
        &self.slot_groups
    }

    pub fn professionals(&self) -> &[ProfessionalProfile] {
        &self.professionals
    }

    pub fn advance(&mut self) -> EditStep {
        self.step = match self.step {
            EditStep::Service => EditStep::Time,
            EditStep::Time | EditStep::Professional => EditStep::Professional,
        };
        self.step
    }

    pub fn back(&mut self) -> EditStep {
        self.step = match self.step {
            EditStep::Professional => EditStep::Time,
            EditStep::Time | EditStep::Service => EditStep::Service,
        };
        self.step
    }

    /// Picking a service clears the time and professional chosen for the previous one.
    pub fn select_service(&mut self, service_id: i64) -> Result<(), BookingError> {
        if !self.services.iter().any(|s| s.id == service_id) {
            return Err(BookingError::UnavailableSelection(format!(
                "service {service_id} is not offered"
            )));
        }

        self.selected_service_id = Some(service_id);
        self.selected_time = None;
        self.selected_professional = None;
        self.slots.clear();
        self.slot_groups.clear();
        self.professionals.clear();
        self.slots_generation.advance();
        self.professionals_generation.advance();
        Ok(())
    }

    pub fn begin_slot_fetch(&mut self) -> Result<SlotQuery, BookingError> {
        let service_id = self.selected_service_id.ok_or(BookingError::IncompleteEdit)?;
        Ok(SlotQuery {
            generation: self.slots_generation.advance(),
            date: self.initial_date.clone(),
            service_id,
        })
    }

    pub fn apply_slots(
        &mut self,
        query: &SlotQuery,
        result: Result<Vec<String>, BookingError>,
    ) -> Result<bool, BookingError> {
        if !self.slots_generation.is_current(query.generation) {
            return Ok(false);
        }
        match result {
            Ok(slots) => {
                self.slot_groups = group_slots_by_period(&slots);
                self.slots = slots;
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
                self.initial_date
            )));
        }
        self.selected_time = Some(time.to_string());
        Ok(())
    }

    pub fn begin_professional_fetch(&mut self) -> Result<ProfessionalQuery, BookingError> {
        let service_id = self.selected_service_id.ok_or(BookingError::IncompleteEdit)?;
        Ok(ProfessionalQuery {
            generation: self.professionals_generation.advance(),
            service_id,
        })
    }

    /// Pre-selects the appointment's current professional when it is in the list.
    pub fn apply_professionals(
        &mut self,
        query: &ProfessionalQuery,
        result: Result<Vec<ProfessionalProfile>, BookingError>,
    ) -> Result<bool, BookingError> {
        if !self.professionals_generation.is_current(query.generation) {
            return Ok(false);
        }
        let professionals = match result {
            Ok(list) => list,
            Err(e) => {
                self.professionals.clear();
                return Err(e);
            }
        };

        if self.selected_professional.is_none() {
            self.selected_professional = self
                .initial_professional_id
                .and_then(|id| professionals.iter().find(|p| p.id == id).cloned());
        }
        self.professionals = professionals;
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
        Ok(())
    }

    /// Minimal patch against the original appointment.
    pub fn build_patch(&self) -> Result<AppointmentPatch, BookingError> {
        let (Some(service_id), Some(time), Some(professional)) = (
            self.selected_service_id,
            self.selected_time.as_deref(),
            self.selected_professional.as_ref(),
        ) else {
            return Err(BookingError::IncompleteEdit);
        };

        let date_time = combine_date_time(&self.initial_date, time)?;

        let patch = AppointmentPatch {
            status: None,
            service_id: Some(service_id).filter(|id| Some(*id) != self.initial_service_id),
            professional: Some(professional.id)
                .filter(|id| Some(*id) != self.initial_professional_id),
            date_time: Some(date_time).filter(|_| time != self.initial_time),
        };

        if patch.is_empty() {
            return Err(BookingError::NoChanges);
        }
        Ok(patch)
    }

    pub async fn submit(
        &mut self,
        credentials: &mut Credentials,
    ) -> Result<serde_json::Value, BookingError> {
        if !credentials.is_authenticated() {
            return Err(BookingError::SessionExpired);
        }

        let patch = self.build_patch()?;
        let updated = self
            .state
            .api
            .update_appointment(self.appointment_id, &patch, credentials)
            .await?;

        tracing::info!(appointment_id = self.appointment_id, "appointment updated");
        Ok(updated)
    }
}

/// The appointment's service id, else a catalog match by name, else the first service.
fn initial_service_id(appointment: &NextAppointment, services: &[Service]) -> Option<i64> {
    appointment
        .service_id
        .or_else(|| {
            let name = appointment.service_name.as_deref()?;
            services.iter().find(|s| s.name == name).map(|s| s.id)
        })
        .or_else(|| services.first().map(|s| s.id))
}
