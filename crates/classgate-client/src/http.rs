//! Status reads against the Classgate HTTP API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use classgate_core::error::{AppError, ErrorKind};
use classgate_core::result::AppResult;
use classgate_core::types::RoomId;

use crate::source::{StatusSnapshot, StatusSource};

#[derive(Debug, Deserialize)]
struct Envelope {
    data: StatusSnapshot,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Issues `GET {base_url}/live/status?roomId=` with the viewer's bearer token.
#[derive(Clone)]
pub struct HttpStatusSource {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl std::fmt::Debug for HttpStatusSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpStatusSource")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpStatusSource {
    /// Create a source for one viewer.
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    "Failed to build status client",
                    e,
                )
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    fn status_url(&self, room_id: &RoomId) -> String {
        // Room ids are restricted to URL-safe characters.
        format!("{}/live/status?roomId={room_id}", self.base_url)
    }
}

#[async_trait]
impl StatusSource for HttpStatusSource {
    async fn fetch(&self, room_id: &RoomId) -> AppResult<StatusSnapshot> {
        let url = self.status_url(room_id);
        debug!(url = %url, "Polling live session status");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::ExternalService,
                    format!("Status request failed: {e}"),
                    e,
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .map(|b| b.message)
                .unwrap_or_else(|_| format!("Status request returned {status}"));
            let kind = match status {
                StatusCode::UNAUTHORIZED => ErrorKind::Unauthenticated,
                StatusCode::FORBIDDEN => ErrorKind::Forbidden,
                StatusCode::NOT_FOUND => ErrorKind::NotFound,
                _ => ErrorKind::ExternalService,
            };
            return Err(AppError::new(kind, message));
        }

        let envelope: Envelope = response.json().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Serialization,
                format!("Malformed status response: {e}"),
                e,
            )
        })?;
        Ok(envelope.data)
    }
}
