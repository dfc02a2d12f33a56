//! Handlers for the platform's built-in intents and session lifecycle

use crate::error::SkillResult;
use crate::handlers::speech;
use crate::protocol::{RequestKind, Response};
use crate::skill::{HandlerInput, RequestHandler};
use async_trait::async_trait;
use tracing::{info, warn};

pub const HELP_INTENT: &str = "AMAZON.HelpIntent";
pub const CANCEL_INTENT: &str = "AMAZON.CancelIntent";
pub const STOP_INTENT: &str = "AMAZON.StopIntent";
pub const CONFIRM_RETRY_NO_INTENT: &str = "ConfirmRetryNoIntent";

pub struct HelpIntentHandler;

#[async_trait]
impl RequestHandler for HelpIntentHandler {
    fn name(&self) -> &'static str {
        "HelpIntentHandler"
    }

    fn can_handle(&self, input: &HandlerInput) -> bool {
        input.is_intent(&[HELP_INTENT])
    }

    async fn handle(&self, input: &HandlerInput) -> SkillResult<Response> {
        Ok(input
            .response_builder()
            .speak(&speech::help())
            .reprompt(speech::OWNER_DEMAND)
            .get_response())
    }
}

/// Cancel, stop, or "no" to the retry question
pub struct CancelAndStopIntentHandler;

#[async_trait]
impl RequestHandler for CancelAndStopIntentHandler {
    fn name(&self) -> &'static str {
        "CancelAndStopIntentHandler"
    }

    fn can_handle(&self, input: &HandlerInput) -> bool {
        input.is_intent(&[CANCEL_INTENT, STOP_INTENT, CONFIRM_RETRY_NO_INTENT])
    }

    async fn handle(&self, input: &HandlerInput) -> SkillResult<Response> {
        Ok(input
            .response_builder()
            .speak(speech::GOODBYE)
            .with_should_end_session(true)
            .get_response())
    }
}

/// The platform closed the session; nothing may be spoken
pub struct SessionEndedRequestHandler;

#[async_trait]
impl RequestHandler for SessionEndedRequestHandler {
    fn name(&self) -> &'static str {
        "SessionEndedRequestHandler"
    }

    fn can_handle(&self, input: &HandlerInput) -> bool {
        input.kind() == RequestKind::SessionEnded
    }

    async fn handle(&self, input: &HandlerInput) -> SkillResult<Response> {
        let request = &input.request_envelope.request;
        let reason = request.reason.as_deref().unwrap_or("UNKNOWN");

        match &request.error {
            Some(error) => warn!("Session ended: reason={}, error={}", reason, error),
            None => info!("Session ended: reason={}", reason),
        }

        Ok(input.response_builder().get_response())
    }
}
