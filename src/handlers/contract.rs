//! Opening handlers: the owner demands the user's name

use crate::error::SkillResult;
use crate::handlers::speech;
use crate::protocol::{RequestKind, Response};
use crate::skill::{HandlerInput, RequestHandler};
use async_trait::async_trait;

/// Session start: explain the game, then make the demand
pub struct LaunchRequestHandler;

#[async_trait]
impl RequestHandler for LaunchRequestHandler {
    fn name(&self) -> &'static str {
        "LaunchRequestHandler"
    }

    fn can_handle(&self, input: &HandlerInput) -> bool {
        input.kind() == RequestKind::Launch
    }

    async fn handle(&self, input: &HandlerInput) -> SkillResult<Response> {
        Ok(input
            .response_builder()
            .speak(&speech::launch())
            .reprompt(speech::OWNER_DEMAND)
            .get_response())
    }
}

pub const STEAL_NAME_INTENT: &str = "StealNameIntent";
pub const CONFIRM_RETRY_YES_INTENT: &str = "ConfirmRetryYesIntent";

/// Start a round, either explicitly or by answering yes to "try again?"
pub struct StealNameIntentHandler;

#[async_trait]
impl RequestHandler for StealNameIntentHandler {
    fn name(&self) -> &'static str {
        "StealNameIntentHandler"
    }

    fn can_handle(&self, input: &HandlerInput) -> bool {
        input.is_intent(&[STEAL_NAME_INTENT, CONFIRM_RETRY_YES_INTENT])
    }

    async fn handle(&self, input: &HandlerInput) -> SkillResult<Response> {
        Ok(input
            .response_builder()
            .speak(speech::OWNER_DEMAND)
            .reprompt(speech::OWNER_DEMAND)
            .get_response())
    }
}
