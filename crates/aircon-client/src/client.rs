//! HTTP client for the AC backend

use std::time::Duration;

use aircon_core::{CommandApplied, CommandIntent, SnapshotResponse};

use crate::dispatcher;
use crate::error::{ClientError, CommandFailure};

/// Backend client bound to one base URL and one acting user
#[derive(Debug, Clone)]
pub struct AcClient {
    client: reqwest::Client,
    base_url: String,
    user: String,
}

impl AcClient {
    pub fn new(base_url: impl Into<String>, user: impl Into<String>) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            user: user.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    /// `GET /ac`
    pub async fn fetch_snapshot(&self) -> Result<SnapshotResponse, ClientError> {
        let url = format!("{}/ac", self.base_url);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// `POST /command`. Transport errors become the generic failure.
    pub async fn send_command(&self, intent: &CommandIntent) -> Result<CommandApplied, CommandFailure> {
        let url = format!("{}/command", self.base_url);
        let request = intent.to_request(&self.user);

        let response = match self.client.post(&url).json(&request).send().await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Command request failed");
                return Err(CommandFailure::generic());
            }
        };

        let success = response.status().is_success();
        let body = response.text().await.unwrap_or_default();
        dispatcher::interpret(success, &body)
    }
}
