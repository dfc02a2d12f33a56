//! Handler traits and the per-request handler input

use crate::error::{SkillError, SkillResult};
use crate::protocol::{RequestEnvelope, RequestKind, Response, ResponseBuilder};
use async_trait::async_trait;

/// Everything a handler sees for one request
#[derive(Debug, Clone)]
pub struct HandlerInput {
    pub request_envelope: RequestEnvelope,
}

impl HandlerInput {
    pub fn new(request_envelope: RequestEnvelope) -> Self {
        Self { request_envelope }
    }

    pub fn kind(&self) -> RequestKind {
        self.request_envelope.kind()
    }

    pub fn request_type(&self) -> &str {
        self.request_envelope.request_type()
    }

    pub fn intent_name(&self) -> Option<&str> {
        self.request_envelope.intent_name()
    }

    /// True for an IntentRequest whose intent is one of `names`
    pub fn is_intent(&self, names: &[&str]) -> bool {
        self.intent_name()
            .map(|name| names.contains(&name))
            .unwrap_or(false)
    }

    pub fn slot_value(&self, slot_name: &str) -> Option<&str> {
        self.request_envelope.slot_value(slot_name)
    }

    /// A fresh builder for this request's response
    pub fn response_builder(&self) -> ResponseBuilder {
        ResponseBuilder::new()
    }
}

/// A request handler in the dispatch chain
#[async_trait]
pub trait RequestHandler: Send + Sync {
    /// Handler name for logging and metrics
    fn name(&self) -> &'static str;

    fn can_handle(&self, input: &HandlerInput) -> bool;

    async fn handle(&self, input: &HandlerInput) -> SkillResult<Response>;
}

/// Turns an error raised during dispatch into a response
#[async_trait]
pub trait ErrorHandler: Send + Sync {
    fn name(&self) -> &'static str;

    fn can_handle(&self, input: &HandlerInput, error: &SkillError) -> bool;

    async fn handle(&self, input: &HandlerInput, error: &SkillError) -> SkillResult<Response>;
}

/// Runs before handler selection on every dispatched request
#[async_trait]
pub trait RequestInterceptor: Send + Sync {
    async fn process(&self, input: &HandlerInput) -> SkillResult<()>;
}
