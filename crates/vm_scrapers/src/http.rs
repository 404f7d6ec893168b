use std::time::Duration;

use serde_json::Value;
use tracing::debug;
use vm_core::{Result, ScraperConfig};

/// Shared HTTP client. Every request carries an explicit timeout and fails
/// on non-2xx statuses.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpClient {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self {
            client,
            timeout: config.timeout(),
        })
    }

    /// Timeout applied by callers that do not pass their own.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn get_text(&self, url: &str, timeout: Duration) -> Result<String> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }

    pub async fn get_json(&self, url: &str, timeout: Duration) -> Result<Value> {
        let body = self.get_text(url, timeout).await?;
        Ok(serde_json::from_str(body.trim())?)
    }
}
