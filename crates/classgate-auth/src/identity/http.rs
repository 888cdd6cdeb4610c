//! HTTP identity provider client.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use classgate_core::config::IdentityConfig;
use classgate_core::error::{AppError, ErrorKind};
use classgate_core::result::AppResult;
use classgate_core::types::UserId;
use classgate_entity::user::UserRole;

use super::IdentityProvider;

/// Issues `PUT {base_url}/users/{id}/role` with a bearer API token.
#[derive(Clone)]
pub struct HttpIdentityProvider {
    client: reqwest::Client,
    base_url: String,
    api_token: String,
}

impl std::fmt::Debug for HttpIdentityProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpIdentityProvider")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpIdentityProvider {
    /// Create a client from configuration.
    pub fn new(config: &IdentityConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    "Failed to build identity provider client",
                    e,
                )
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        })
    }

    fn role_url(&self, user_id: UserId) -> String {
        format!("{}/users/{user_id}/role", self.base_url)
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn set_role(&self, user_id: UserId, role: UserRole) -> AppResult<()> {
        let url = self.role_url(user_id);
        debug!(url = %url, role = %role, "Pushing role to identity provider");

        self.client
            .put(&url)
            .bearer_auth(&self.api_token)
            .json(&serde_json::json!({ "role": role }))
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::UpstreamPartialFailure,
                    format!("Identity provider role update failed: {e}"),
                    e,
                )
            })?;
        Ok(())
    }
}
