use std::future::Future;
use std::time::Duration;
use tracing::debug;

use crate::config::Config;
use crate::error::UpstreamError;

/// Where draw history comes from. The body is returned raw; shape checks live
/// in the normalizer.
pub trait DrawSource {
    fn history_url(&self, province_code: &str) -> String;

    fn fetch_history(
        &self,
        province_code: &str,
    ) -> impl Future<Output = Result<String, UpstreamError>> + Send;
}

/// HTTP client for the provider's history endpoint.
#[derive(Debug, Clone)]
pub struct LotteryApi {
    client: reqwest::Client,
    base_url: String,
}

impl LotteryApi {
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, UpstreamError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| UpstreamError::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, UpstreamError> {
        Self::new(config.api_base_url.clone(), config.fetch_timeout())
    }
}

impl DrawSource for LotteryApi {
    fn history_url(&self, province_code: &str) -> String {
        format!("{}{}", self.base_url, province_code)
    }

    async fn fetch_history(&self, province_code: &str) -> Result<String, UpstreamError> {
        let url = self.history_url(province_code);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(describe_reqwest_error(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Transport(format!(
                "HTTP {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("")
            )));
        }

        response
            .text()
            .await
            .map_err(|e| UpstreamError::Transport(describe_reqwest_error(&e)))
    }
}

fn describe_reqwest_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("request timed out: {}", e)
    } else {
        format!("request failed: {}", e)
    }
}
