//! Reqwest-backed adapter for the upstream employee service.
//!
//! This adapter owns transport details only: request construction, per
//! attempt timeouts, HTTP error mapping, envelope decoding, and the retry
//! loop driven by [`RetryPolicy`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use super::dto::{CreateEmployeeBody, DeleteEmployeeBody, EmployeeDto, Envelope};
use super::retry::{BackoffJitter, RandomJitter, RetryPolicy, Sleeper, TokioSleeper};
use crate::domain::ports::{EmployeeSource, EmployeeSourceError};
use crate::domain::{Employee, ValidEmployeeInput};

/// Upstream source adapter issuing JSON requests against one base URL.
pub struct UpstreamEmployeeSource {
    client: Client,
    base_url: Url,
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
    jitter: Arc<dyn BackoffJitter>,
}

impl UpstreamEmployeeSource {
    /// Build an adapter with a per-attempt connect and response timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base_url: Url,
        timeout: Duration,
        policy: RetryPolicy,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url,
            policy,
            sleeper: Arc::new(TokioSleeper),
            jitter: Arc::new(RandomJitter),
        })
    }

    /// Replace the sleep and jitter implementations.
    ///
    /// Production uses the tokio sleeper and random jitter; tests inject
    /// deterministic doubles so nothing sleeps for real.
    #[must_use]
    pub fn with_runtime(
        mut self,
        sleeper: Arc<dyn Sleeper>,
        jitter: Arc<dyn BackoffJitter>,
    ) -> Self {
        self.sleeper = sleeper;
        self.jitter = jitter;
        self
    }

    fn item_url(&self, id: &str) -> Result<Url, EmployeeSourceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| EmployeeSourceError::Rejected {
                message: "upstream base URL cannot carry path segments".to_owned(),
            })?
            .push(id);
        Ok(url)
    }

    /// Run one logical call, retrying per the policy.
    ///
    /// Retryable failures sleep the jittered backoff delay and try again
    /// until the attempt budget runs out; exhaustion surfaces as a distinct
    /// error. Non-retryable failures surface immediately.
    async fn execute<T, B>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<Envelope<T>, EmployeeSourceError>
    where
        T: DeserializeOwned,
        B: Serialize + Sync,
    {
        let mut attempt = 1u32;
        loop {
            match self.attempt(method.clone(), url.clone(), body).await {
                Ok(envelope) => return Ok(envelope),
                Err(error) if self.policy.should_retry(&error, attempt) => {
                    let delay = self.jitter.jittered(self.policy.base_delay(attempt));
                    warn!(
                        attempt,
                        max_attempts = self.policy.max_attempts,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %error,
                        "retrying upstream request"
                    );
                    self.sleeper.sleep(delay).await;
                    attempt += 1;
                }
                Err(error) if error.is_retryable() => {
                    return Err(EmployeeSourceError::RetriesExhausted {
                        attempts: attempt,
                        message: error.to_string(),
                    });
                }
                Err(error) => return Err(error),
            }
        }
    }

    async fn attempt<T, B>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<Envelope<T>, EmployeeSourceError>
    where
        T: DeserializeOwned,
        B: Serialize + Sync,
    {
        let mut request = self
            .client
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await.map_err(map_transport_error)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, bytes.as_ref()));
        }
        serde_json::from_slice(bytes.as_ref()).map_err(|error| EmployeeSourceError::Decode {
            message: format!("invalid upstream envelope: {error}"),
        })
    }
}

#[async_trait]
impl EmployeeSource for UpstreamEmployeeSource {
    async fn fetch_all(&self) -> Result<Vec<Employee>, EmployeeSourceError> {
        let envelope: Envelope<Vec<EmployeeDto>> = self
            .execute::<_, ()>(Method::GET, self.base_url.clone(), None)
            .await?;
        Ok(envelope
            .data
            .unwrap_or_default()
            .into_iter()
            .map(Employee::from)
            .collect())
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Option<Employee>, EmployeeSourceError> {
        let url = self.item_url(id)?;
        match self.execute::<EmployeeDto, ()>(Method::GET, url, None).await {
            Ok(envelope) => Ok(envelope.data.map(Employee::from)),
            Err(EmployeeSourceError::NotFound { .. }) => Ok(None),
            Err(error) => Err(error),
        }
    }

    async fn create(
        &self,
        input: &ValidEmployeeInput,
    ) -> Result<Option<Employee>, EmployeeSourceError> {
        let body = CreateEmployeeBody::from(input);
        let envelope: Envelope<EmployeeDto> = self
            .execute(Method::POST, self.base_url.clone(), Some(&body))
            .await?;
        Ok(envelope.data.map(Employee::from))
    }

    async fn delete_by_name(&self, name: &str) -> Result<bool, EmployeeSourceError> {
        let body = DeleteEmployeeBody { name };
        let envelope: Envelope<bool> = self
            .execute(Method::DELETE, self.base_url.clone(), Some(&body))
            .await?;
        Ok(envelope.data.unwrap_or(false))
    }
}

fn map_transport_error(error: reqwest::Error) -> EmployeeSourceError {
    if error.is_timeout() {
        EmployeeSourceError::Timeout {
            message: error.to_string(),
        }
    } else {
        EmployeeSourceError::Transport {
            message: error.to_string(),
        }
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> EmployeeSourceError {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), preview)
    };

    match status {
        StatusCode::TOO_MANY_REQUESTS => EmployeeSourceError::RateLimited { message },
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            EmployeeSourceError::Timeout { message }
        }
        StatusCode::NOT_FOUND => EmployeeSourceError::NotFound { message },
        _ if status.is_client_error() => EmployeeSourceError::Rejected { message },
        _ => EmployeeSourceError::Transport { message },
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
