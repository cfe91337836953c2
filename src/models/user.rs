use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub cpf: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub profile_pic: Option<String>,
}

/// Editable profile fields sent with `PATCH /webapp/users/me/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
    pub cpf: String,
    pub phone: String,
    pub date_of_birth: String,
}

impl From<&UserProfile> for ProfileUpdate {
    fn from(profile: &UserProfile) -> Self {
        Self {
            name: profile.name.clone(),
            email: profile.email.clone(),
            cpf: profile.cpf.clone().unwrap_or_default(),
            phone: profile.phone.clone().unwrap_or_default(),
            date_of_birth: profile.date_of_birth.clone().unwrap_or_default(),
        }
    }
}
