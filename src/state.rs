use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::services::api::BookingApi;
use crate::services::auth::AuthenticatedClient;
use crate::services::drafts::DraftStore;
use crate::services::http::reqwest_transport::ReqwestTransport;
use crate::services::storage::sqlite::SqliteStore;

pub struct AppState {
    pub config: AppConfig,
    pub api: BookingApi,
    pub drafts: DraftStore,
}

impl AppState {
    pub fn new(config: AppConfig, api: BookingApi, drafts: DraftStore) -> Self {
        Self {
            config,
            api,
            drafts,
        }
    }

    /// Wires the reqwest transport and the SQLite draft store from config.
    /// An unusable draft database degrades to a detached store.
    pub fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        anyhow::ensure!(
            !config.api_base_url.is_empty(),
            "API_BASE_URL must be set"
        );

        let transport =
            ReqwestTransport::new(Duration::from_secs(config.request_timeout_secs))?;
        let api = BookingApi::new(AuthenticatedClient::new(
            Box::new(transport),
            config.api_base_url.clone(),
        ));

        let drafts = match SqliteStore::open(&config.draft_db_path) {
            Ok(store) => DraftStore::new(Arc::new(store)),
            Err(e) => {
                tracing::warn!(error = %e, path = %config.draft_db_path, "draft storage unavailable, drafts will not persist");
                DraftStore::detached()
            }
        };

        Ok(Self::new(config, api, drafts))
    }
}
