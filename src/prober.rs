//! Liveness probing of service endpoints

use crate::errors::{MonitorError, Result};
use crate::service::Status;
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

/// Classifies one endpoint as up or down. Implementations never fail;
/// every error and every non-success response collapses to [`Status::Down`].
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, url: &str) -> Status;
}

/// HEAD-request prober backed by a shared reqwest client
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: Client,
}

impl HttpProber {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(format!("web_monitor/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(MonitorError::Http)?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, url: &str) -> Status {
        // Redirects are followed by the client; only the final status counts
        match self.client.head(url).send().await {
            Ok(response) if response.status().is_success() => {
                debug!("Probe {} answered {}", url, response.status());
                Status::Up
            }
            Ok(response) => {
                debug!("Probe {} returned non-success status {}", url, response.status());
                Status::Down
            }
            Err(e) => {
                debug!("Probe {} failed: {}", url, e);
                Status::Down
            }
        }
    }
}
