use serde::{Deserialize, Serialize};

/// Origin tag the backend expects on appointments booked through this client.
pub const APPOINTMENT_ORIGIN: &str = "schedule_system";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppointmentStatus {
    #[serde(rename = "agendado")]
    Scheduled,
    #[serde(rename = "cancelado")]
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "agendado",
            AppointmentStatus::Cancelled => "cancelado",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "agendado" => Some(AppointmentStatus::Scheduled),
            "cancelado" => Some(AppointmentStatus::Cancelled),
            _ => None,
        }
    }
}

/// Projection returned by `GET /webapp/appointments/next/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextAppointment {
    pub id: i64,
    pub date_time: String,
    #[serde(default)]
    pub professional: Option<i64>,
    #[serde(default)]
    pub professional_name: Option<String>,
    // Older backends send `service` instead of `service_id`.
    #[serde(default, alias = "service")]
    pub service_id: Option<i64>,
    #[serde(default)]
    pub service_name: Option<String>,
    #[serde(default)]
    pub price_paid: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentServiceItem {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub category_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentAppointment {
    pub id: i64,
    pub date_time: String,
    #[serde(default)]
    pub professional_name: Option<String>,
    #[serde(default)]
    pub services: Vec<AppointmentServiceItem>,
    #[serde(default)]
    pub price_paid: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentAppointmentsPage {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<RecentAppointment>,
}

impl RecentAppointmentsPage {
    pub fn has_more(&self) -> bool {
        self.next.is_some()
    }
}

/// Body of `POST /webapp/appointments/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAppointment {
    pub service_id: i64,
    pub date_time: String,
    pub professional: i64,
    pub appointment_origin: String,
}

/// Body of `PATCH /webapp/appointments/{id}/update/`; only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppointmentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub professional: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<i64>,
}

impl AppointmentPatch {
    pub fn cancel() -> Self {
        Self {
            status: Some(AppointmentStatus::Cancelled),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.date_time.is_none()
            && self.professional.is_none()
            && self.service_id.is_none()
    }
}
