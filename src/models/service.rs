use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: i64,
    pub name: String,
    /// Decimal string, e.g. `"45.00"`.
    pub price: String,
    #[serde(default)]
    pub category: Option<i64>,
    #[serde(default)]
    pub category_name: String,
    /// `HH:MM:SS`
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub service_photo: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceCategory {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
}
