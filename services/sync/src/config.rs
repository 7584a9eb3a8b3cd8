use uuid::Uuid;

use fluxpos_core::config::{parsed_or, required};

/// Sync service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Local store URL (default `sqlite://fluxpos.db?mode=rwc`). Env var:
    /// `DATABASE_URL`.
    pub database_url: String,
    /// Remote backend base URL, e.g. "https://api.fluxpos.example". Env
    /// var: `REMOTE_BASE_URL`.
    pub remote_base_url: String,
    /// API key sent as both `apikey` and bearer token. Env var:
    /// `REMOTE_API_KEY`.
    pub remote_api_key: String,
    /// This device's location. Env var: `LOCATION_ID`.
    pub location_id: Uuid,
    /// Recent-row window for history collections (default 200). Env var:
    /// `HISTORY_WINDOW`.
    pub history_window: u64,
    /// Seconds between connectivity probes (default 15). Env var:
    /// `CONNECTIVITY_POLL_SECS`.
    pub connectivity_poll_secs: u64,
    /// Trigger channel depth (default 16). Env var: `TRIGGER_QUEUE_DEPTH`.
    pub trigger_queue_depth: usize,
}

impl SyncConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: parsed_or(
                "DATABASE_URL",
                "sqlite://fluxpos.db?mode=rwc".to_owned(),
            ),
            remote_base_url: required("REMOTE_BASE_URL"),
            remote_api_key: required("REMOTE_API_KEY"),
            location_id: required("LOCATION_ID")
                .parse()
                .unwrap_or_else(|_| panic!("LOCATION_ID is not a uuid")),
            history_window: parsed_or("HISTORY_WINDOW", 200),
            connectivity_poll_secs: parsed_or("CONNECTIVITY_POLL_SECS", 15),
            trigger_queue_depth: parsed_or("TRIGGER_QUEUE_DEPTH", 16),
        }
    }
}
