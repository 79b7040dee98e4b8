use crate::core::{AllocationCalculator, AllocationRequest};
use crate::utils::error::{ForwardError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_CALCULATOR_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Where the Allocation Calculator lives and how long one call may take.
///
/// `connect_timeout` must stay below `timeout`: a host that never answers the
/// handshake is reported as unreachable, not as a slow reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalculatorConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl CalculatorConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    /// Connect phase bound, halved when it would otherwise reach the total timeout.
    fn effective_connect_timeout(&self) -> Duration {
        if self.connect_timeout < self.timeout {
            self.connect_timeout
        } else {
            self.timeout / 2
        }
    }

    pub fn allocate_url(&self) -> String {
        format!("{}/allocate", self.base_url.trim_end_matches('/'))
    }
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CALCULATOR_URL)
    }
}

pub struct HttpCalculator {
    client: Client,
    config: CalculatorConfig,
}

impl HttpCalculator {
    pub fn new(config: CalculatorConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.effective_connect_timeout())
            .build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl AllocationCalculator for HttpCalculator {
    async fn allocate(
        &self,
        request: &AllocationRequest<'_>,
    ) -> std::result::Result<serde_json::Value, ForwardError> {
        let url = self.config.allocate_url();
        tracing::debug!("📡 POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(ForwardError::from_transport)?;

        let status = response.status();
        tracing::debug!("📡 Calculator response status: {}", status);

        if !status.is_success() {
            // 錯誤回應若是 JSON 就留著給畫面顯示
            let body = response.json::<serde_json::Value>().await.ok();
            return Err(ForwardError::Status { status, body });
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(ForwardError::from_transport)
    }
}
