use std::sync::Arc;

use crate::errors::BookingError;
use crate::models::{Credentials, NextAppointment, Service};
use crate::services::edit::EditSession;
use crate::state::AppState;

/// The "next appointment" card: shows the upcoming appointment and hosts the
/// cancel and edit entry points.
pub struct UpcomingAppointment {
    state: Arc<AppState>,
    current: Option<NextAppointment>,
}

impl UpcomingAppointment {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            state,
            current: None,
        }
    }

    pub async fn load(state: Arc<AppState>, credentials: &mut Credentials) -> Self {
        let mut card = Self::new(state);
        card.refresh(credentials).await;
        card
    }

    pub fn current(&self) -> Option<&NextAppointment> {
        self.current.as_ref()
    }

    /// Re-fetches the next appointment. Any failure leaves the card empty.
    pub async fn refresh(&mut self, credentials: &mut Credentials) -> Option<&NextAppointment> {
        self.current = match self.state.api.next_appointment(credentials).await {
            Ok(next) => next,
            Err(e) => {
                tracing::warn!(error = %e, "could not load next appointment");
                None
            }
        };
        self.current.as_ref()
    }

    /// Cancels the shown appointment, then reloads the card. Fails with
    /// `NoAppointment` when the card is empty.
    pub async fn cancel(&mut self, credentials: &mut Credentials) -> Result<(), BookingError> {
        if !credentials.is_authenticated() {
            return Err(BookingError::SessionExpired);
        }
        let appointment_id = self
            .current
            .as_ref()
            .map(|a| a.id)
            .ok_or(BookingError::NoAppointment)?;

        self.state
            .api
            .cancel_appointment(appointment_id, credentials)
            .await?;
        tracing::info!(appointment_id, "appointment cancelled");

        self.refresh(credentials).await;
        Ok(())
    }

    pub fn edit(&self, services: Vec<Service>) -> Result<EditSession, BookingError> {
        let appointment = self
            .current
            .as_ref()
            .filter(|a| a.service_id.is_some())
            .ok_or(BookingError::MissingService)?;
        EditSession::new(Arc::clone(&self.state), appointment, services)
    }
}
