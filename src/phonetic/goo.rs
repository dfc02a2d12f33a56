//! goo labs hiragana API client
//!
//! Sends `{app_id, request_id, sentence, output_type}` as JSON and reads back
//! `{request_id, output_type, converted}`. One attempt per call; a failed
//! conversion surfaces to the caller unchanged.

use crate::phonetic::{OutputType, PhoneticConverter, PhoneticError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

/// goo hiragana client configuration
#[derive(Debug, Clone)]
pub struct GooHiraganaConfig {
    pub app_id: String,
    pub endpoint: String,
    pub output_type: OutputType,
    pub timeout: Duration,
}

impl Default for GooHiraganaConfig {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            endpoint: "https://labs.goo.ne.jp/api/hiragana".to_string(),
            output_type: OutputType::Hiragana,
            timeout: Duration::from_millis(3000),
        }
    }
}

pub struct GooHiraganaClient {
    config: GooHiraganaConfig,
    client: Client,
}

#[derive(Debug, Serialize)]
struct HiraganaRequest<'a> {
    app_id: &'a str,
    request_id: String,
    sentence: &'a str,
    output_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct HiraganaResponse {
    #[serde(default)]
    request_id: Option<String>,
    converted: String,
}

#[derive(Debug, Deserialize)]
struct HiraganaErrorResponse {
    error: HiraganaErrorDetails,
}

#[derive(Debug, Deserialize)]
struct HiraganaErrorDetails {
    message: String,
}

impl GooHiraganaClient {
    pub fn new(config: GooHiraganaConfig) -> Result<Self, PhoneticError> {
        if config.app_id.is_empty() {
            return Err(PhoneticError::NotConfigured(
                "goo app_id is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PhoneticError::Network(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Pull `error.message` out of an error body, falling back to the raw text
    fn parse_error_message(body: &str) -> String {
        serde_json::from_str::<HiraganaErrorResponse>(body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| body.trim().to_string())
    }

    /// Remove the word separators the API inserts between readings
    fn normalize_converted(converted: &str) -> String {
        converted.chars().filter(|c| !c.is_whitespace()).collect()
    }
}

#[async_trait]
impl PhoneticConverter for GooHiraganaClient {
    fn name(&self) -> &str {
        "goo"
    }

    async fn convert(&self, text: &str) -> Result<String, PhoneticError> {
        let request = HiraganaRequest {
            app_id: &self.config.app_id,
            request_id: Uuid::new_v4().to_string(),
            sentence: text,
            output_type: self.config.output_type.as_str(),
        };

        debug!(
            "goo conversion request: request_id={}, output_type={}",
            request.request_id, request.output_type
        );

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                let error_msg = format!(
                    "HTTP request failed: {} (is_connect: {}, is_timeout: {})",
                    e,
                    e.is_connect(),
                    e.is_timeout()
                );
                warn!("goo network error: {}", error_msg);
                PhoneticError::Network(error_msg)
            })?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = Self::parse_error_message(&body);
            warn!("goo API error - Status: {}, Message: {}", status, message);
            return Err(PhoneticError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: HiraganaResponse = response
            .json()
            .await
            .map_err(|e| PhoneticError::InvalidResponse(e.to_string()))?;

        let reading = Self::normalize_converted(&parsed.converted);
        if reading.is_empty() {
            return Err(PhoneticError::InvalidResponse(format!(
                "empty reading for request {}",
                parsed.request_id.as_deref().unwrap_or("unknown")
            )));
        }

        debug!("goo conversion succeeded: {} chars", reading.chars().count());
        Ok(reading)
    }
}
