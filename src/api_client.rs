use crate::error::ApiError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Serialize)]
pub struct StatusQuery {
    pub from_date: i64,
}

/// Source of homework status payloads, polled once per cycle.
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Fetch every update newer than `cursor` (epoch seconds).
    async fn fetch(&self, cursor: i64) -> Result<Value, ApiError>;
}

pub struct ApiClient {
    endpoint: String,
    token: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(endpoint: String, token: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            endpoint,
            token,
            client,
        })
    }
}

#[async_trait]
impl StatusSource for ApiClient {
    async fn fetch(&self, cursor: i64) -> Result<Value, ApiError> {
        let from_date = if cursor == 0 {
            chrono::Utc::now().timestamp()
        } else {
            cursor
        };
        debug!("Requesting homework statuses from_date={}", from_date);

        let response = self
            .client
            .get(&self.endpoint)
            .header(reqwest::header::AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&StatusQuery { from_date })
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ApiError::AccessStatus(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| ApiError::Parse(e.to_string()))
    }
}
