//! HTTP implementation of the grammar backend API.
//!
//! All exchanges are JSON over a fixed base origin. Non-success
//! responses are turned into `ApiError::Status`, carrying the `detail`
//! field of the body when the backend sent one.

use crate::api::GrammarApi;
use crate::config;
use crate::error::ApiError;
use crate::models::{
    AnalysisResult, AnalyzeRequest, CreateStudentRequest, ErrorBody, ErrorLogEntry, Feedback,
    Student, StudentId,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Connection settings for the backend.
#[derive(Debug, Clone)]
pub struct HttpApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for HttpApiConfig {
    fn default() -> Self {
        Self {
            base_url: config::default_base_url(),
            timeout_seconds: config::default_timeout(),
            user_agent: config::default_user_agent(),
        }
    }
}

/// reqwest-backed `GrammarApi`.
pub struct HttpApi {
    config: HttpApiConfig,
    http_client: reqwest::Client,
}

impl HttpApi {
    pub fn new(mut config: HttpApiConfig) -> Result<Self> {
        let trimmed = config.base_url.trim_end_matches('/').to_string();
        config.base_url = trimmed;

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// Send a request and decode a JSON success body.
    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Transport(
                    format!("request timed out after {}s", self.config.timeout_seconds).into(),
                )
            } else if e.is_connect() {
                ApiError::Transport(
                    format!("cannot connect to {}: {}", self.config.base_url, e).into(),
                )
            } else {
                ApiError::Transport(Box::new(e))
            }
        })?;

        let status = response.status();
        debug!("{} {}", status.as_u16(), response.url());

        if !status.is_success() {
            let detail = extract_detail(response).await;
            return Err(ApiError::Status { status, detail });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Transport(Box::new(e)))
    }
}

/// Pull `detail` out of an error body. Any read or parse failure yields `None`.
async fn extract_detail(response: Response) -> Option<String> {
    let body = response.text().await.unwrap_or_default();
    parse_detail(&body)
}

fn parse_detail(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail)
        .filter(|d| !d.trim().is_empty())
}

#[async_trait]
impl GrammarApi for HttpApi {
    async fn create_student(&self, name: &str) -> Result<Student, ApiError> {
        let body = CreateStudentRequest {
            name: name.to_string(),
        };
        debug!("POST /students name={:?}", name);
        self.execute(self.http_client.post(self.url("/students")).json(&body))
            .await
    }

    async fn analyze(&self, student_id: StudentId, text: &str) -> Result<AnalysisResult, ApiError> {
        let body = AnalyzeRequest {
            student_id,
            text: text.to_string(),
        };
        debug!("POST /analyze student_id={} ({} chars)", student_id, text.len());
        self.execute(self.http_client.post(self.url("/analyze")).json(&body))
            .await
    }

    async fn feedback(&self, student_id: StudentId) -> Result<Feedback, ApiError> {
        let path = format!("/students/{}/feedback", student_id);
        debug!("GET {}", path);
        self.execute(self.http_client.get(self.url(&path))).await
    }

    async fn error_history(&self, student_id: StudentId) -> Result<Vec<ErrorLogEntry>, ApiError> {
        let path = format!("/students/{}/errors", student_id);
        debug!("GET {}", path);
        self.execute(self.http_client.get(self.url(&path))).await
    }
}
