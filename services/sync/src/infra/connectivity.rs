//! Connectivity detection: a cheap health probe against the backend.

use std::time::Duration;

use crate::domain::repository::ConnectivityProbe;

#[derive(Clone)]
pub struct HttpConnectivityProbe {
    client: reqwest::Client,
    health_url: String,
    timeout: Duration,
}

impl HttpConnectivityProbe {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            health_url: format!("{}/healthz", base_url.trim_end_matches('/')),
            timeout: Duration::from_secs(5),
        }
    }
}

impl ConnectivityProbe for HttpConnectivityProbe {
    async fn is_online(&self) -> bool {
        match self
            .client
            .get(&self.health_url)
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                tracing::debug!(error = %err, "health probe failed");
                false
            }
        }
    }
}
