use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_base_url: String,
    pub draft_db_path: String,
    pub request_timeout_secs: u64,
    pub date_window_days: usize,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            api_base_url: env::var("API_BASE_URL")
                .or_else(|_| env::var("NEXT_PUBLIC_API_BASE_URL"))
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_default(),
            draft_db_path: env::var("DRAFT_DB_PATH")
                .unwrap_or_else(|_| "booking_draft.db".to_string()),
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(15),
            date_window_days: env::var("DATE_WINDOW_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|days| *days > 0)
                .unwrap_or(10),
            access_token: env::var("ACCESS_TOKEN").ok().filter(|v| !v.is_empty()),
            refresh_token: env::var("REFRESH_TOKEN").ok().filter(|v| !v.is_empty()),
        }
    }
}
