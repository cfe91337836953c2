use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfessionalProfile {
    pub id: i64,
    pub user_name: String,
    #[serde(default)]
    pub user_profile_pic: Option<String>,
}

impl ProfessionalProfile {
    /// Avatar fallback: first letter of the first two name parts.
    pub fn initials(&self) -> String {
        self.user_name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .take(2)
            .collect()
    }
}
