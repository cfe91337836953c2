use serde::{Deserialize, Serialize};

/// One selectable calendar day in the booking window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateOption {
    /// Zero-padded `YYYY-MM-DD`, sortable.
    pub key: String,
    pub label: String,
    pub weekday: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    Morning,
    Afternoon,
    Evening,
    Other,
}

impl Period {
    /// Any numeric hour is bucketed, fractional or negative included; NaN is `Other`.
    pub fn from_hour(hour: f64) -> Self {
        if hour.is_nan() {
            Period::Other
        } else if hour < 12.0 {
            Period::Morning
        } else if hour < 18.0 {
            Period::Afternoon
        } else {
            Period::Evening
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Period::Morning => "Morning",
            Period::Afternoon => "Afternoon",
            Period::Evening => "Evening",
            Period::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotGroup {
    pub period: Period,
    pub label: String,
    pub slots: Vec<String>,
}

/// Body of `GET /webapp/appointments/available-times/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AvailableTimes {
    #[serde(default)]
    pub slots: Vec<String>,
}
