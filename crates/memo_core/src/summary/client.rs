//! Summary endpoint client.
//!
//! # Responsibility
//! - POST memo content to the summary endpoint and decode the reply.
//!
//! # Invariants
//! - One request per call; no retries.
//! - Transport default timeouts apply; none are set here.
//! - Memo content is never written to logs.

use log::{error, info};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Fallback failure text when the endpoint does not provide one.
pub const DEFAULT_FAILURE_MESSAGE: &str = "Failed to generate summary";

/// Summary service failure.
#[derive(Debug, thiserror::Error)]
pub enum SummarizationError {
    #[error("summary request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("summary endpoint returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("summary response could not be decoded: {0}")]
    Decode(String),
}

/// Produces a summary for markdown content.
pub trait Summarizer: Send + Sync {
    fn summarize(&self, content: &str) -> Result<String, SummarizationError>;
}

#[derive(Debug, Serialize)]
struct SummaryRequest<'a> {
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    summary: String,
}

#[derive(Debug, Default, Deserialize)]
struct SummaryErrorResponse {
    #[serde(default)]
    error: Option<String>,
}

/// HTTP summarizer posting `{"content": ...}` to a fixed endpoint.
pub struct HttpSummarizer {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl HttpSummarizer {
    /// Builds a client for `endpoint`.
    pub fn try_new(endpoint: impl Into<String>) -> Result<Self, SummarizationError> {
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(SummarizationError::Transport)?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Summarizer for HttpSummarizer {
    fn summarize(&self, content: &str) -> Result<String, SummarizationError> {
        let started_at = Instant::now();
        let response = self
            .client
            .post(&self.endpoint)
            .json(&SummaryRequest { content })
            .send()
            .map_err(|err| {
                error!(
                    "event=summary_request module=summary status=error error_code=transport timeout={} connect={} error={}",
                    err.is_timeout(),
                    err.is_connect(),
                    err
                );
                SummarizationError::Transport(err)
            })?;

        let status = response.status();
        let body = response.text().map_err(|err| {
            error!(
                "event=summary_request module=summary status=error error_code=body_read http_status={} error={}",
                status.as_u16(),
                err
            );
            SummarizationError::Transport(err)
        })?;

        if !status.is_success() {
            let message = serde_json::from_str::<SummaryErrorResponse>(&body)
                .ok()
                .and_then(|parsed| parsed.error)
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string());
            error!(
                "event=summary_request module=summary status=error error_code=http_status http_status={} duration_ms={}",
                status.as_u16(),
                started_at.elapsed().as_millis()
            );
            return Err(SummarizationError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: SummaryResponse = serde_json::from_str(&body).map_err(|err| {
            error!(
                "event=summary_request module=summary status=error error_code=decode http_status={} error={}",
                status.as_u16(),
                err
            );
            SummarizationError::Decode(err.to_string())
        })?;

        info!(
            "event=summary_request module=summary status=ok http_status={} duration_ms={} summary_chars={}",
            status.as_u16(),
            started_at.elapsed().as_millis(),
            parsed.summary.chars().count()
        );
        Ok(parsed.summary)
    }
}
