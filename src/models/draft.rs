use serde::{Deserialize, Serialize};

use super::{ProfessionalProfile, Service};

/// In-progress booking, filled one wizard step at a time.
///
/// Stored as camelCase JSON so drafts written by the web client stay readable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub professional_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub professional_name: Option<String>,
}

impl AppointmentDraft {
    pub fn for_service(service: &Service) -> Self {
        Self {
            service_id: Some(service.id),
            service_name: Some(service.name.clone()),
            service_price: Some(service.price.clone()),
            ..Self::default()
        }
    }

    pub fn set_professional(&mut self, professional: Option<&ProfessionalProfile>) {
        self.professional_id = professional.map(|p| p.id);
        self.professional_name = professional.map(|p| p.user_name.clone());
    }

    pub fn is_complete(&self) -> bool {
        self.service_id.is_some()
            && self.date.is_some()
            && self.time.is_some()
            && self.professional_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_camel_case_and_skips_missing() {
        let draft = AppointmentDraft {
            service_id: Some(5),
            date: Some("2024-06-01".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&draft).unwrap();
        assert_eq!(json, r#"{"serviceId":5,"date":"2024-06-01"}"#);
    }

    #[test]
    fn test_reads_web_client_draft() {
        let json = r#"{"serviceId":5,"serviceName":"Corte","servicePrice":"45.00","date":"2024-06-01","time":"09:00","professionalId":3,"professionalName":"Joao"}"#;
        let draft: AppointmentDraft = serde_json::from_str(json).unwrap();
        assert_eq!(draft.professional_id, Some(3));
        assert!(draft.is_complete());
    }

    #[test]
    fn test_incomplete_without_professional() {
        let draft = AppointmentDraft {
            service_id: Some(5),
            date: Some("2024-06-01".to_string()),
            time: Some("09:00".to_string()),
            ..Default::default()
        };
        assert!(!draft.is_complete());
    }
}
