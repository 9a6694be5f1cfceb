use crate::domain::{Record, SubmitRequest};
use crate::error::RelayError;
use crate::port::RecordSink;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tracing::info;
use url::Url;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Outbound transport: a pooled, kept-alive HTTP client against one peer.
/// `connect` probes the peer's health endpoint so an unreachable peer is a
/// startup failure rather than a first-record failure.
#[derive(Debug)]
pub struct RemoteSink {
    client: reqwest::Client,
    submit_url: Url,
    health_url: Url,
}

impl RemoteSink {
    pub async fn connect(endpoint: &Url) -> Result<Self, RelayError> {
        let submit_url = endpoint
            .join("/v1/submit")
            .map_err(|e| RelayError::Config(format!("invalid peer endpoint: {e}")))?;
        let health_url = endpoint
            .join("/v1/health")
            .map_err(|e| RelayError::Config(format!("invalid peer endpoint: {e}")))?;

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .pool_max_idle_per_host(1)
            .pool_idle_timeout(None)
            .user_agent(concat!("logferry/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RelayError::Config(format!("failed to build HTTP client: {e}")))?;

        let sink = Self {
            client,
            submit_url,
            health_url,
        };
        sink.probe(endpoint).await?;
        info!(peer = %endpoint, "connected to peer");
        Ok(sink)
    }

    async fn probe(&self, endpoint: &Url) -> Result<(), RelayError> {
        let response = self
            .client
            .get(self.health_url.clone())
            .send()
            .await
            .map_err(|source| RelayError::Dial {
                endpoint: endpoint.to_string(),
                source,
            })?;
        if !response.status().is_success() {
            return Err(RelayError::PeerStatus {
                status: response.status().as_u16(),
            });
        }
        Ok(())
    }

    async fn submit(&self, content: &str) -> Result<(), RelayError> {
        let response = self
            .client
            .post(self.submit_url.clone())
            .json(&SubmitRequest {
                content: content.to_string(),
            })
            .send()
            .await
            .map_err(RelayError::Forward)?;
        if !response.status().is_success() {
            return Err(RelayError::PeerStatus {
                status: response.status().as_u16(),
            });
        }
        Ok(())
    }
}

impl RecordSink for RemoteSink {
    fn deliver<'a>(
        &'a self,
        record: &'a Record,
    ) -> Pin<Box<dyn Future<Output = Result<(), RelayError>> + Send + 'a>> {
        Box::pin(self.submit(record.as_str()))
    }
}
