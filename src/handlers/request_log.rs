//! Request logging interceptor

use crate::error::SkillResult;
use crate::skill::{HandlerInput, RequestInterceptor};
use async_trait::async_trait;
use tracing::{debug, info};

/// Logs every dispatched request; the full envelope only at DEBUG
pub struct RequestLog;

#[async_trait]
impl RequestInterceptor for RequestLog {
    async fn process(&self, input: &HandlerInput) -> SkillResult<()> {
        if tracing::enabled!(tracing::Level::DEBUG) {
            match serde_json::to_string(&input.request_envelope) {
                Ok(json) => debug!("Request envelope: {}", json),
                Err(e) => debug!("Request envelope not serializable: {}", e),
            }
        }

        match input.intent_name() {
            Some(intent) => info!(
                "Request type: {}, intent: {}",
                input.request_type(),
                intent
            ),
            None => info!("Request type: {}", input.request_type()),
        }

        Ok(())
    }
}
