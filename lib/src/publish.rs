//! Delivery of the result document to a reporting API.

use std::time::Duration;

use anyhow::Context;
use anyhow::Result;
use reqwest::Client;
use tracing::debug;
use tracing::instrument;

use crate::report::RunResult;

pub use reqwest::Url;

/// Posts run results as JSON to a fixed endpoint.
#[derive(Debug, Clone)]
pub struct ReportPublisher {
    client: Client,
    url: Url,
}

impl ReportPublisher {
    /// # Errors
    ///
    /// If the HTTP client cannot be built.
    pub fn new(url: Url, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed building HTTP client")?;
        Ok(Self::with_client(client, url))
    }

    #[must_use]
    pub fn with_client(client: Client, url: Url) -> Self {
        Self { client, url }
    }

    /// Sends `result` with the same fields it prints on stdout.
    ///
    /// # Errors
    ///
    /// If the request fails or the endpoint answers with an error status.
    #[instrument(skip_all, fields(url = %self.url))]
    pub async fn publish(&self, result: &RunResult) -> Result<()> {
        let response = self
            .client
            .post(self.url.clone())
            .json(result)
            .send()
            .await
            .context("failed sending result")?
            .error_for_status()
            .context("reporting endpoint rejected result")?;

        debug!(status = %response.status(), "result published");
        Ok(())
    }
}
