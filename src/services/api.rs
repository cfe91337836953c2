use reqwest::Url;
use serde::de::DeserializeOwned;

use crate::errors::{Action, BookingError};
use crate::models::{
    AppointmentPatch, AvailableTimes, Credentials, NewAppointment, NextAppointment,
    ProfessionalProfile, ProfileUpdate, RecentAppointmentsPage, Service, ServiceCategory,
    UserProfile,
};
use crate::services::auth::AuthenticatedClient;
use crate::services::catalog::normalize_search;
use crate::services::http::{ApiError, ApiRequest, ApiResponse};

pub const DEFAULT_RECENT_PAGE_SIZE: u32 = 2;

/// Typed access to the barbershop REST backend.
///
/// Every call goes through [`AuthenticatedClient`]; a token renewed during a
/// call is written back into the caller's `Credentials`.
pub struct BookingApi {
    client: AuthenticatedClient,
}

impl BookingApi {
    pub fn new(client: AuthenticatedClient) -> Self {
        Self { client }
    }

    // ── Catalog ──

    pub async fn services(&self, search: &str) -> Result<Vec<Service>, BookingError> {
        let search = normalize_search(search)?;
        let url = self.url_with_query("/webapp/services/", &[("search", search.as_str())])?;
        self.get_json(Action::LoadServices, url, &mut Credentials::anonymous())
            .await
    }

    pub async fn service_categories(&self) -> Result<Vec<ServiceCategory>, BookingError> {
        let url = self.url("/webapp/service-categories/");
        self.get_json(Action::LoadCategories, url, &mut Credentials::anonymous())
            .await
    }

    pub async fn available_times(
        &self,
        date: &str,
        service_id: i64,
    ) -> Result<Vec<String>, BookingError> {
        let service_id = service_id.to_string();
        let url = self.url_with_query(
            "/webapp/appointments/available-times/",
            &[("date", date), ("service_id", service_id.as_str())],
        )?;
        let times: AvailableTimes = self
            .get_json(Action::LoadSlots, url, &mut Credentials::anonymous())
            .await?;
        Ok(times.slots)
    }

    pub async fn professionals(
        &self,
        service_id: i64,
    ) -> Result<Vec<ProfessionalProfile>, BookingError> {
        let service_id = service_id.to_string();
        let url = self.url_with_query(
            "/webapp/professional-profiles/",
            &[("service_id", service_id.as_str())],
        )?;
        self.get_json(Action::LoadProfessionals, url, &mut Credentials::anonymous())
            .await
    }

    // ── Appointments ──

    pub async fn create_appointment(
        &self,
        appointment: &NewAppointment,
        credentials: &mut Credentials,
    ) -> Result<serde_json::Value, BookingError> {
        let action = Action::CreateAppointment;
        let body = to_body(action, appointment)?;
        let request = ApiRequest::post(self.url("/webapp/appointments/"), body);
        let response = self.send(action, request, credentials).await?;
        decode(action, &expect_success(action, response)?)
    }

    pub async fn update_appointment(
        &self,
        appointment_id: i64,
        patch: &AppointmentPatch,
        credentials: &mut Credentials,
    ) -> Result<serde_json::Value, BookingError> {
        self.patch_appointment(Action::UpdateAppointment, appointment_id, patch, credentials)
            .await
    }

    pub async fn cancel_appointment(
        &self,
        appointment_id: i64,
        credentials: &mut Credentials,
    ) -> Result<serde_json::Value, BookingError> {
        self.patch_appointment(
            Action::CancelAppointment,
            appointment_id,
            &AppointmentPatch::cancel(),
            credentials,
        )
        .await
    }

    async fn patch_appointment(
        &self,
        action: Action,
        appointment_id: i64,
        patch: &AppointmentPatch,
        credentials: &mut Credentials,
    ) -> Result<serde_json::Value, BookingError> {
        if patch.is_empty() {
            return Err(BookingError::NoChanges);
        }
        let body = to_body(action, patch)?;
        let url = self.url(&format!("/webapp/appointments/{appointment_id}/update/"));
        let response = self
            .send(action, ApiRequest::patch(url, body), credentials)
            .await?;
        decode(action, &expect_success(action, response)?)
    }

    /// `None` when the backend answers 404 (no upcoming appointment).
    pub async fn next_appointment(
        &self,
        credentials: &mut Credentials,
    ) -> Result<Option<NextAppointment>, BookingError> {
        let action = Action::LoadNextAppointment;
        let request = ApiRequest::get(self.url("/webapp/appointments/next/"));
        let response = self.send(action, request, credentials).await?;
        if response.status == 404 {
            return Ok(None);
        }
        decode(action, &expect_success(action, response)?).map(Some)
    }

    pub async fn recent_appointments(
        &self,
        page: u32,
        page_size: u32,
        credentials: &mut Credentials,
    ) -> Result<RecentAppointmentsPage, BookingError> {
        let page = page.max(1).to_string();
        let page_size = page_size.max(1).to_string();
        let url = self.url_with_query(
            "/webapp/appointments/recent/",
            &[("page", page.as_str()), ("page_size", page_size.as_str())],
        )?;
        self.get_json(Action::LoadRecentAppointments, url, credentials)
            .await
    }

    // ── Profile ──

    pub async fn profile(&self, credentials: &mut Credentials) -> Result<UserProfile, BookingError> {
        let url = self.url("/webapp/users/me/");
        self.get_json(Action::LoadProfile, url, credentials).await
    }

    pub async fn update_profile(
        &self,
        update: &ProfileUpdate,
        credentials: &mut Credentials,
    ) -> Result<UserProfile, BookingError> {
        let action = Action::SaveProfile;
        let body = to_body(action, update)?;
        let request = ApiRequest::patch(self.url("/webapp/users/me/"), body);
        let response = self.send(action, request, credentials).await?;
        decode(action, &expect_success(action, response)?)
    }

    // ── Plumbing ──

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.client.base_url())
    }

    fn url_with_query(&self, path: &str, params: &[(&str, &str)]) -> Result<String, BookingError> {
        Url::parse_with_params(&self.url(path), params)
            .map(String::from)
            .map_err(|e| BookingError::Config(format!("invalid API base URL: {e}")))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        action: Action,
        url: String,
        credentials: &mut Credentials,
    ) -> Result<T, BookingError> {
        let response = self.send(action, ApiRequest::get(url), credentials).await?;
        decode(action, &expect_success(action, response)?)
    }

    async fn send(
        &self,
        action: Action,
        request: ApiRequest,
        credentials: &mut Credentials,
    ) -> Result<ApiResponse, BookingError> {
        let authed = self.client.request(request, credentials).await.map_err(|e| {
            tracing::warn!(action = %action, error = %e, "request failed");
            BookingError::request(action, e)
        })?;

        if authed.refreshed {
            credentials.access_token = authed.access_token;
        }

        Ok(authed.response)
    }
}

fn expect_success(action: Action, response: ApiResponse) -> Result<ApiResponse, BookingError> {
    if response.is_success() {
        return Ok(response);
    }

    tracing::warn!(action = %action, status = response.status, "backend returned an error");

    if response.status == 401 {
        return Err(BookingError::SessionExpired);
    }

    Err(BookingError::request(
        action,
        ApiError::Status {
            status: response.status,
            body: response.body,
        },
    ))
}

fn decode<T: DeserializeOwned>(action: Action, response: &ApiResponse) -> Result<T, BookingError> {
    response
        .json()
        .map_err(|e| BookingError::request(action, e))
}

fn to_body<T: serde::Serialize>(action: Action, value: &T) -> Result<serde_json::Value, BookingError> {
    serde_json::to_value(value).map_err(|e| BookingError::request(action, ApiError::Decode(e)))
}
