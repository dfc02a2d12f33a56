//! Catch-all handlers at the end of the chain

use crate::error::{sanitize_error_message, SkillError, SkillResult};
use crate::handlers::speech;
use crate::protocol::{RequestKind, Response};
use crate::skill::{ErrorHandler, HandlerInput, RequestHandler};
use async_trait::async_trait;
use tracing::{error, warn};

/// Any IntentRequest nothing earlier claimed. Must be registered last.
pub struct IntentReflectorHandler;

#[async_trait]
impl RequestHandler for IntentReflectorHandler {
    fn name(&self) -> &'static str {
        "IntentReflectorHandler"
    }

    fn can_handle(&self, input: &HandlerInput) -> bool {
        input.kind() == RequestKind::Intent
    }

    async fn handle(&self, input: &HandlerInput) -> SkillResult<Response> {
        warn!(
            "Unexpected intent: {}",
            input.intent_name().unwrap_or("<missing>")
        );
        Ok(input
            .response_builder()
            .speak(speech::UNEXPECTED_REQUEST)
            .get_response())
    }
}

/// Apologizes for every error raised in the chain
pub struct GenericErrorHandler;

#[async_trait]
impl ErrorHandler for GenericErrorHandler {
    fn name(&self) -> &'static str {
        "GenericErrorHandler"
    }

    fn can_handle(&self, _input: &HandlerInput, _error: &SkillError) -> bool {
        true
    }

    async fn handle(&self, input: &HandlerInput, err: &SkillError) -> SkillResult<Response> {
        error!(
            request_type = %input.request_type(),
            intent = input.intent_name().unwrap_or(""),
            "Error handled: {}",
            sanitize_error_message(&err.to_string())
        );

        Ok(input
            .response_builder()
            .speak(speech::APOLOGY)
            .reprompt(speech::APOLOGY)
            .get_response())
    }
}
