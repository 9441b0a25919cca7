use std::time::Duration;

use ureq::{Agent, AgentBuilder};

use super::error::FetchError;
use super::types::ApiPosition;
use super::PositionSource;

/// Polls a fixed HTTP endpoint with a plain GET.
#[derive(Clone)]
pub struct HttpSource {
    agent: Agent,
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        let agent = AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn fetch_blocking(&self) -> Result<ApiPosition, FetchError> {
        let response = self.agent.get(&self.url).call()?;

        // ureq only errors on 4xx/5xx; anything else that is not a plain 200 is still a miss.
        if response.status() != 200 {
            return Err(FetchError::Status(response.status()));
        }

        let body = response.into_string()?;
        ApiPosition::from_slice(body.as_bytes())
    }
}

impl PositionSource for HttpSource {
    async fn fetch(&self) -> Result<ApiPosition, FetchError> {
        let source = self.clone();
        log::debug!("GET {}", source.url);
        tokio::task::spawn_blocking(move || source.fetch_blocking())
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?
    }
}
