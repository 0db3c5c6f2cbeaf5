use std::time::Duration;

use dash_logging::{dash_debug, dash_trace};
use futures_util::StreamExt;
use queuedash_core::{BucketSecs, JobsQuery, QueueStat, WireJob};
use serde::de::DeserializeOwned;
use url::Url;

use crate::{Endpoints, FailureKind, FetchError};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
            max_bytes: 8 * 1024 * 1024,
        }
    }
}

/// Read-only view of the job-queue backend.
///
/// List endpoints may answer `null` instead of an empty array, which is kept
/// as `None` so the reducer can tell "absent" from "empty".
#[async_trait::async_trait]
pub trait DashboardApi: Send + Sync {
    async fn jobs(&self, query: &JobsQuery) -> Result<Option<Vec<WireJob>>, FetchError>;

    async fn job(&self, id: &str) -> Result<WireJob, FetchError>;

    async fn queue_stats(
        &self,
        buckets: &[BucketSecs],
    ) -> Result<Option<Vec<QueueStat>>, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestApi {
    endpoints: Endpoints,
    settings: FetchSettings,
    client: reqwest::Client,
}

impl ReqwestApi {
    pub fn new(endpoints: Endpoints, settings: FetchSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            endpoints,
            settings,
            client,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        dash_trace!("GET {}", url);
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = body.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            body.extend_from_slice(&chunk);
        }
        dash_debug!("GET {} -> {} ({} bytes)", url, status, body.len());

        serde_json::from_slice(&body)
            .map_err(|err| FetchError::new(FailureKind::MalformedBody, err.to_string()))
    }
}

#[async_trait::async_trait]
impl DashboardApi for ReqwestApi {
    async fn jobs(&self, query: &JobsQuery) -> Result<Option<Vec<WireJob>>, FetchError> {
        let url = self.endpoints.jobs(query)?;
        self.get_json(url).await
    }

    async fn job(&self, id: &str) -> Result<WireJob, FetchError> {
        let url = self.endpoints.job(id)?;
        self.get_json(url).await
    }

    async fn queue_stats(
        &self,
        buckets: &[BucketSecs],
    ) -> Result<Option<Vec<QueueStat>>, FetchError> {
        let url = self.endpoints.queue_stats(buckets)?;
        self.get_json(url).await
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
