//! HTTP client for the remote backend (a PostgREST-style API: table CRUD
//! under `/rest/v1/{table}`, procedures under `/rest/v1/rpc/{name}`).

use std::time::Duration;

use reqwest::{Response, StatusCode};
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::repository::RemoteBackend;
use crate::domain::types::{RemoteError, RemoteErrorKind};

const DELIVERY_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct HttpRemoteBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl HttpRemoteBackend {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            api_key: api_key.into(),
            timeout: DELIVERY_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    /// Headers plus a per-request deadline. A stalled socket must resolve
    /// into a connectivity error instead of wedging the drain permit.
    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .timeout(self.timeout)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn expect_ok(&self, response: Response) -> Result<Response, RemoteError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(error_from_response(status, &body))
    }
}

/// Structured error body the backend returns on rejection.
#[derive(Deserialize)]
struct RemoteErrorBody {
    kind: String,
    #[serde(default)]
    message: String,
}

fn error_from_response(status: StatusCode, body: &str) -> RemoteError {
    if let Ok(parsed) = serde_json::from_str::<RemoteErrorBody>(body) {
        return RemoteError {
            kind: RemoteErrorKind::from_code(&parsed.kind),
            message: if parsed.message.is_empty() {
                parsed.kind
            } else {
                parsed.message
            },
        };
    }
    let message = format!("remote returned {status}: {body}");
    if status.is_client_error() {
        RemoteError::validation(message)
    } else {
        RemoteError::internal(message)
    }
}

fn transport_error(err: reqwest::Error) -> RemoteError {
    RemoteError::connectivity(err.to_string())
}

impl RemoteBackend for HttpRemoteBackend {
    async fn insert(&self, table: &str, row: &serde_json::Value) -> Result<(), RemoteError> {
        let response = self
            .request(self.client.post(self.table_url(table)))
            .json(row)
            .send()
            .await
            .map_err(transport_error)?;
        self.expect_ok(response).await?;
        Ok(())
    }

    async fn update(
        &self,
        table: &str,
        id: Uuid,
        row: &serde_json::Value,
    ) -> Result<(), RemoteError> {
        let url = format!("{}?id=eq.{id}", self.table_url(table));
        let response = self
            .request(self.client.patch(url))
            .json(row)
            .send()
            .await
            .map_err(transport_error)?;
        self.expect_ok(response).await?;
        Ok(())
    }

    async fn delete(&self, table: &str, id: Uuid) -> Result<(), RemoteError> {
        let url = format!("{}?id=eq.{id}", self.table_url(table));
        let response = self
            .request(self.client.delete(url))
            .send()
            .await
            .map_err(transport_error)?;
        self.expect_ok(response).await?;
        Ok(())
    }

    async fn call_procedure(&self, name: &str, args: &serde_json::Value) -> Result<(), RemoteError> {
        let url = format!("{}/rest/v1/rpc/{name}", self.base_url);
        let response = self
            .request(self.client.post(url))
            .json(args)
            .send()
            .await
            .map_err(transport_error)?;
        self.expect_ok(response).await?;
        Ok(())
    }

    async fn fetch_all(
        &self,
        table: &str,
        location_id: Option<Uuid>,
        limit: Option<u64>,
    ) -> Result<Vec<serde_json::Value>, RemoteError> {
        let mut url = format!("{}?select=*", self.table_url(table));
        if let Some(location_id) = location_id {
            url.push_str(&format!("&location_id=eq.{location_id}"));
        }
        if let Some(limit) = limit {
            // Bounded recent window for history tables.
            url.push_str(&format!("&order=created_at.desc&limit={limit}"));
        }
        let response = self
            .request(self.client.get(url))
            .send()
            .await
            .map_err(transport_error)?;
        let response = self.expect_ok(response).await?;
        response
            .json::<Vec<serde_json::Value>>()
            .await
            .map_err(|err| RemoteError::internal(format!("malformed pull response: {err}")))
    }
}
