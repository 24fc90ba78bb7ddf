//! Per-account settings collaborator.
//!
//! The auth service does not own account preferences; it asks a settings
//! service whether two-factor is enabled for an account. The trait keeps the
//! HTTP dependency out of unit tests.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

/// Settings lookup failures.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("settings response malformed: {0}")]
    Malformed(String),
}

/// Answers whether two-factor login is enabled for an account.
#[async_trait]
pub trait SettingsClient: Send + Sync {
    async fn two_factor_enabled(&self, account_id: Uuid) -> Result<bool, SettingsError>;
}

/// HTTP-backed settings client.
pub struct HttpSettingsClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct TwoFactorSetting {
    enabled: bool,
}

impl HttpSettingsClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl SettingsClient for HttpSettingsClient {
    async fn two_factor_enabled(&self, account_id: Uuid) -> Result<bool, SettingsError> {
        let url = format!(
            "{}/v1/accounts/{}/settings/two-factor",
            self.base_url, account_id
        );
        let response = self.client.get(&url).send().await?.error_for_status()?;
        let setting: TwoFactorSetting = response
            .json()
            .await
            .map_err(|e| SettingsError::Malformed(e.to_string()))?;
        Ok(setting.enabled)
    }
}

/// Fixed-answer client for deployments without a settings service.
pub struct StaticSettingsClient {
    enabled: bool,
}

impl StaticSettingsClient {
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

#[async_trait]
impl SettingsClient for StaticSettingsClient {
    async fn two_factor_enabled(&self, _account_id: Uuid) -> Result<bool, SettingsError> {
        Ok(self.enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_client_answers_fixed_value() {
        let client = StaticSettingsClient::new(true);
        assert!(client.two_factor_enabled(Uuid::new_v4()).await.unwrap());
        let client = StaticSettingsClient::new(false);
        assert!(!client.two_factor_enabled(Uuid::new_v4()).await.unwrap());
    }
}
