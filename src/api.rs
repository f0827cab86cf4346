//! Container management API client.
//!
//! [`ContainerApi`] is the seam the orchestrator calls through; the reqwest
//! implementation talks to a wharf-style management server. Credentials are
//! threaded explicitly per client, never stashed globally.

use crate::error::ApiError;
use crate::model::{ApiConfig, Container};
use reqwest::StatusCode;
use std::collections::HashMap;

/// Remote operations on a container. `update_labels` may reissue the
/// container under a new id; callers must adopt the returned identity.
pub trait ContainerApi {
    async fn fetch_container(&self, id: &str) -> Result<Container, ApiError>;
    async fn rename_container(&self, id: &str, new_name: &str) -> Result<Container, ApiError>;
    async fn update_labels(
        &self,
        id: &str,
        labels: &HashMap<String, String>,
    ) -> Result<Container, ApiError>;
}

#[derive(Clone, Debug)]
pub struct ContainerClient {
    http: reqwest::Client,
    base_url: reqwest::Url,
    token: String,
}

impl ContainerClient {
    pub fn new(cfg: &ApiConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(cfg.user_agent.clone())
            .timeout(cfg.timeout)
            .build()?;
        let base_url = reqwest::Url::parse(&cfg.base_url)
            .map_err(|e| ApiError::InvalidBaseUrl(e.to_string()))?;
        Ok(Self {
            http,
            base_url,
            token: cfg.token.clone(),
        })
    }

    /// Build an absolute endpoint URL under the configured base.
    fn endpoint(&self, path: &str) -> Result<reqwest::Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::InvalidBaseUrl(e.to_string()))
    }

    async fn read_container(id: &str, resp: reqwest::Response) -> Result<Container, ApiError> {
        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(id.to_string()));
        }
        let body = resp.text().await?;
        if status == StatusCode::CONFLICT {
            return Err(ApiError::Conflict(error_message(&body)));
        }
        if !status.is_success() {
            tracing::warn!(%status, "server rejected container request");
            return Err(ApiError::Server {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }
        serde_json::from_str(&body).map_err(|e| ApiError::Server {
            status: status.as_u16(),
            message: format!("malformed container response: {e}"),
        })
    }
}

/// Extract the server's error text. The management API wraps failures as
/// `{"error": "..."}`; fall back to the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            let msg = v.get("error").or_else(|| v.get("message"))?;
            msg.as_str().map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

impl ContainerApi for ContainerClient {
    async fn fetch_container(&self, id: &str) -> Result<Container, ApiError> {
        let url = self.endpoint(&format!("containers/{id}/json"))?;
        tracing::debug!(%url, "fetching container");
        let resp = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::read_container(id, resp).await
    }

    async fn rename_container(&self, id: &str, new_name: &str) -> Result<Container, ApiError> {
        let mut url = self.endpoint(&format!("containers/{id}/rename"))?;
        url.query_pairs_mut().append_pair("name", new_name);
        tracing::debug!(%url, "renaming container");
        let resp = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::read_container(id, resp).await
    }

    async fn update_labels(
        &self,
        id: &str,
        labels: &HashMap<String, String>,
    ) -> Result<Container, ApiError> {
        let url = self.endpoint(&format!("containers/{id}/labels"))?;
        tracing::debug!(%url, count = labels.len(), "updating container labels");
        let resp = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .json(labels)
            .send()
            .await?;
        Self::read_container(id, resp).await
    }
}
