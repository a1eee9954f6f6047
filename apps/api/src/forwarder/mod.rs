//! Submission forwarder — the single point of entry for handing a finished
//! application to the external submission endpoint.
//!
//! Carried in `AppState` as `Arc<dyn SubmissionForwarder>` so tests can swap
//! in a recording double without touching handler code. The HTTP
//! implementation retries 429/5xx and transport failures (timeouts
//! included) with exponential backoff; the per-request timeout is bounded
//! so a hung endpoint cannot park a session in `Submitting` forever.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

const FORWARD_TIMEOUT_SECS: u64 = 15;
const MAX_RETRIES: u32 = 3;

/// The payload handed to the submission endpoint. Field names follow the
/// endpoint's convention, hence the camelCase rename.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub job_id: Uuid,
    pub form_id: Uuid,
    /// Label-keyed form data, see `forms::submission`.
    pub form_data: Map<String, Value>,
    pub candidate_name: Option<String>,
    pub candidate_email: Option<String>,
    pub candidate_phone: Option<String>,
}

#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Submission endpoint error (status {status}): {message}")]
    Endpoint { status: u16, message: String },

    #[error("Submission endpoint unavailable after {retries} attempts")]
    RetriesExhausted { retries: u32 },
}

#[async_trait]
pub trait SubmissionForwarder: Send + Sync {
    async fn forward(&self, payload: &SubmissionPayload) -> Result<(), ForwardError>;
}

/// Default forwarder: POSTs the payload as JSON to the configured endpoint.
#[derive(Clone)]
pub struct HttpForwarder {
    client: Client,
    endpoint: String,
}

impl HttpForwarder {
    pub fn new(endpoint: String) -> HttpForwarder {
        HttpForwarder {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(FORWARD_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            endpoint,
        }
    }
}

#[async_trait]
impl SubmissionForwarder for HttpForwarder {
    async fn forward(&self, payload: &SubmissionPayload) -> Result<(), ForwardError> {
        let mut last_error: Option<ForwardError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "Submission forward attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self.client.post(&self.endpoint).json(payload).send().await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    // Timeouts and transport failures are retryable.
                    last_error = Some(ForwardError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Submission endpoint returned {}: {}", status, body);
                last_error = Some(ForwardError::Endpoint {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(ForwardError::Endpoint {
                    status: status.as_u16(),
                    message,
                });
            }

            debug!(
                "Forwarded submission for job {} form {}",
                payload.job_id, payload.form_id
            );
            return Ok(());
        }

        Err(last_error.unwrap_or(ForwardError::RetriesExhausted {
            retries: MAX_RETRIES,
        }))
    }
}
