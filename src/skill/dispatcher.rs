//! Skill assembly and request dispatch
//!
//! A [`Skill`] owns three ordered lists: interceptors, request handlers and
//! error handlers. Dispatch is a linear scan and the first handler whose
//! `can_handle` returns true produces the response, so registration order is
//! part of the behavior.

use crate::error::{SkillError, SkillResult};
use crate::observability::metrics::metrics;
use crate::protocol::{RequestEnvelope, Response, ResponseEnvelope};
use crate::skill::handler::{ErrorHandler, HandlerInput, RequestHandler, RequestInterceptor};
use crate::{handler_span, request_span};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, warn, Instrument};

/// Builder for [`Skill`]
#[derive(Default)]
pub struct SkillBuilder {
    request_handlers: Vec<Arc<dyn RequestHandler>>,
    error_handlers: Vec<Arc<dyn ErrorHandler>>,
    interceptors: Vec<Arc<dyn RequestInterceptor>>,
    application_id: Option<String>,
}

impl SkillBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_request_handler(mut self, handler: Arc<dyn RequestHandler>) -> Self {
        self.request_handlers.push(handler);
        self
    }

    /// Append handlers, preserving their order
    pub fn add_request_handlers<I>(mut self, handlers: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn RequestHandler>>,
    {
        self.request_handlers.extend(handlers);
        self
    }

    pub fn add_error_handler(mut self, handler: Arc<dyn ErrorHandler>) -> Self {
        self.error_handlers.push(handler);
        self
    }

    pub fn add_request_interceptor(mut self, interceptor: Arc<dyn RequestInterceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    /// Refuse envelopes addressed to any other application
    pub fn with_application_id(mut self, application_id: Option<String>) -> Self {
        self.application_id = application_id;
        self
    }

    pub fn build(self) -> Skill {
        Skill {
            request_handlers: self.request_handlers,
            error_handlers: self.error_handlers,
            interceptors: self.interceptors,
            application_id: self.application_id,
        }
    }
}

/// An assembled, immutable handler chain
pub struct Skill {
    request_handlers: Vec<Arc<dyn RequestHandler>>,
    error_handlers: Vec<Arc<dyn ErrorHandler>>,
    interceptors: Vec<Arc<dyn RequestInterceptor>>,
    application_id: Option<String>,
}

impl Skill {
    pub fn builder() -> SkillBuilder {
        SkillBuilder::new()
    }

    /// Names of the registered request handlers, in dispatch order
    pub fn handler_names(&self) -> Vec<&'static str> {
        self.request_handlers.iter().map(|h| h.name()).collect()
    }

    /// Process one request envelope into a response envelope
    pub async fn invoke(&self, envelope: RequestEnvelope) -> SkillResult<ResponseEnvelope> {
        let start = Instant::now();
        let span = request_span!(
            request_id = %envelope.request.request_id,
            request_type = %envelope.request_type()
        );

        async move {
            self.verify_application_id(&envelope)?;
            metrics().request_received(&envelope.kind());

            let session_attributes = envelope.session_attributes().cloned();
            let input = HandlerInput::new(envelope);

            let response = match self.dispatch(&input).await {
                Ok(response) => response,
                Err(err) => self.handle_error(&input, err).await?,
            };

            metrics().request_completed(start.elapsed());
            Ok::<_, SkillError>(ResponseEnvelope::new(response, session_attributes))
        }
        .instrument(span)
        .await
    }

    fn verify_application_id(&self, envelope: &RequestEnvelope) -> SkillResult<()> {
        let Some(expected) = &self.application_id else {
            return Ok(());
        };

        let actual = envelope.application_id();
        if actual != Some(expected.as_str()) {
            warn!(
                "Rejecting request for application {:?}, expected {}",
                actual, expected
            );
            metrics().request_rejected();
            return Err(SkillError::ApplicationIdMismatch {
                expected: expected.clone(),
                actual: actual.map(str::to_string),
            });
        }
        Ok(())
    }

    async fn dispatch(&self, input: &HandlerInput) -> SkillResult<Response> {
        for interceptor in &self.interceptors {
            interceptor.process(input).await?;
        }

        let handler = self
            .request_handlers
            .iter()
            .find(|handler| handler.can_handle(input))
            .ok_or_else(|| SkillError::no_handler(input.request_type(), input.intent_name()))?;

        debug!("Dispatching to {}", handler.name());
        metrics().handler_matched(handler.name());

        handler
            .handle(input)
            .instrument(handler_span!(handler = handler.name()))
            .await
    }

    async fn handle_error(&self, input: &HandlerInput, err: SkillError) -> SkillResult<Response> {
        let Some(error_handler) = self
            .error_handlers
            .iter()
            .find(|handler| handler.can_handle(input, &err))
        else {
            error!("No error handler accepted error: {}", err);
            metrics().error_unhandled();
            return Err(err);
        };

        let result = error_handler
            .handle(input, &err)
            .instrument(handler_span!(handler = error_handler.name()))
            .await;

        match &result {
            Ok(_) => metrics().error_handled(),
            Err(handler_err) => {
                error!(
                    "Error handler {} failed: {} (while handling: {})",
                    error_handler.name(),
                    handler_err,
                    err
                );
                metrics().error_unhandled();
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{intent_request, launch_request};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedHandler {
        name: &'static str,
        intent: Option<&'static str>,
        speech: &'static str,
    }

    #[async_trait]
    impl RequestHandler for FixedHandler {
        fn name(&self) -> &'static str {
            self.name
        }

        fn can_handle(&self, input: &HandlerInput) -> bool {
            match self.intent {
                Some(intent) => input.is_intent(&[intent]),
                None => true,
            }
        }

        async fn handle(&self, input: &HandlerInput) -> SkillResult<Response> {
            Ok(input.response_builder().speak(self.speech).get_response())
        }
    }

    struct FailingHandler;

    #[async_trait]
    impl RequestHandler for FailingHandler {
        fn name(&self) -> &'static str {
            "FailingHandler"
        }

        fn can_handle(&self, _input: &HandlerInput) -> bool {
            true
        }

        async fn handle(&self, _input: &HandlerInput) -> SkillResult<Response> {
            Err(SkillError::internal_error("handler exploded"))
        }
    }

    struct OnlyMissingSlot;

    #[async_trait]
    impl ErrorHandler for OnlyMissingSlot {
        fn name(&self) -> &'static str {
            "OnlyMissingSlot"
        }

        fn can_handle(&self, _input: &HandlerInput, error: &SkillError) -> bool {
            matches!(error, SkillError::MissingSlot { .. })
        }

        async fn handle(&self, input: &HandlerInput, _error: &SkillError) -> SkillResult<Response> {
            Ok(input.response_builder().speak("slot").get_response())
        }
    }

    struct CatchAll;

    #[async_trait]
    impl ErrorHandler for CatchAll {
        fn name(&self) -> &'static str {
            "CatchAll"
        }

        fn can_handle(&self, _input: &HandlerInput, _error: &SkillError) -> bool {
            true
        }

        async fn handle(&self, input: &HandlerInput, _error: &SkillError) -> SkillResult<Response> {
            Ok(input.response_builder().speak("sorry").get_response())
        }
    }

    #[derive(Default)]
    struct CountingInterceptor {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RequestInterceptor for CountingInterceptor {
        async fn process(&self, _input: &HandlerInput) -> SkillResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct FailingInterceptor;

    #[async_trait]
    impl RequestInterceptor for FailingInterceptor {
        async fn process(&self, _input: &HandlerInput) -> SkillResult<()> {
            Err(SkillError::invalid_request("interceptor refused request"))
        }
    }

    /// Counts how often it is asked to handle a request
    #[derive(Default)]
    struct CountingHandler {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RequestHandler for CountingHandler {
        fn name(&self) -> &'static str {
            "CountingHandler"
        }

        fn can_handle(&self, _input: &HandlerInput) -> bool {
            true
        }

        async fn handle(&self, input: &HandlerInput) -> SkillResult<Response> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(input.response_builder().speak("handled").get_response())
        }
    }

    struct BrokenErrorHandler;

    #[async_trait]
    impl ErrorHandler for BrokenErrorHandler {
        fn name(&self) -> &'static str {
            "BrokenErrorHandler"
        }

        fn can_handle(&self, _input: &HandlerInput, _error: &SkillError) -> bool {
            true
        }

        async fn handle(&self, _input: &HandlerInput, _error: &SkillError) -> SkillResult<Response> {
            Err(SkillError::internal_error("error handler exploded"))
        }
    }

    fn speech(envelope: &ResponseEnvelope) -> &str {
        envelope.response.output_speech.as_ref().unwrap().content()
    }

    #[tokio::test]
    async fn test_first_matching_handler_wins() {
        let skill = Skill::builder()
            .add_request_handler(Arc::new(FixedHandler {
                name: "First",
                intent: Some("HelloIntent"),
                speech: "first",
            }))
            .add_request_handler(Arc::new(FixedHandler {
                name: "Second",
                intent: Some("HelloIntent"),
                speech: "second",
            }))
            .build();

        let response = skill.invoke(intent_request("HelloIntent", &[])).await.unwrap();
        assert_eq!(speech(&response), "<speak>first</speak>");
    }

    #[tokio::test]
    async fn test_fallback_handler_catches_unmatched() {
        let skill = Skill::builder()
            .add_request_handler(Arc::new(FixedHandler {
                name: "Hello",
                intent: Some("HelloIntent"),
                speech: "hello",
            }))
            .add_request_handler(Arc::new(FixedHandler {
                name: "Fallback",
                intent: None,
                speech: "fallback",
            }))
            .build();

        let response = skill.invoke(intent_request("OtherIntent", &[])).await.unwrap();
        assert_eq!(speech(&response), "<speak>fallback</speak>");
    }

    #[tokio::test]
    async fn test_no_handler_without_error_handler_is_returned() {
        let skill = Skill::builder().build();

        let result = skill.invoke(launch_request()).await;
        assert!(matches!(result, Err(SkillError::NoHandler { .. })));
    }

    #[tokio::test]
    async fn test_no_handler_goes_to_error_handler() {
        let skill = Skill::builder()
            .add_error_handler(Arc::new(CatchAll))
            .build();

        let response = skill.invoke(launch_request()).await.unwrap();
        assert_eq!(speech(&response), "<speak>sorry</speak>");
    }

    #[tokio::test]
    async fn test_error_handlers_are_consulted_in_order() {
        let skill = Skill::builder()
            .add_request_handler(Arc::new(FailingHandler))
            .add_error_handler(Arc::new(OnlyMissingSlot))
            .add_error_handler(Arc::new(CatchAll))
            .build();

        let response = skill.invoke(launch_request()).await.unwrap();
        assert_eq!(speech(&response), "<speak>sorry</speak>");
    }

    #[tokio::test]
    async fn test_interceptors_run_once_per_request() {
        let interceptor = Arc::new(CountingInterceptor::default());
        let skill = Skill::builder()
            .add_request_interceptor(interceptor.clone())
            .add_request_handler(Arc::new(FixedHandler {
                name: "Any",
                intent: None,
                speech: "ok",
            }))
            .build();

        skill.invoke(launch_request()).await.unwrap();
        skill.invoke(launch_request()).await.unwrap();
        assert_eq!(interceptor.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_application_id_mismatch_skips_handlers() {
        let interceptor = Arc::new(CountingInterceptor::default());
        let skill = Skill::builder()
            .with_application_id(Some("amzn1.ask.skill.expected".to_string()))
            .add_request_interceptor(interceptor.clone())
            .add_error_handler(Arc::new(CatchAll))
            .build();

        let result = skill.invoke(launch_request()).await;
        assert!(matches!(
            result,
            Err(SkillError::ApplicationIdMismatch { .. })
        ));
        assert_eq!(interceptor.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_interceptor_error_goes_to_error_handler() {
        let handler = Arc::new(CountingHandler::default());
        let skill = Skill::builder()
            .add_request_interceptor(Arc::new(FailingInterceptor))
            .add_request_handler(handler.clone())
            .add_error_handler(Arc::new(CatchAll))
            .build();

        let response = skill.invoke(launch_request()).await.unwrap();
        assert_eq!(speech(&response), "<speak>sorry</speak>");
        assert_eq!(handler.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_interceptor_error_without_error_handler_is_returned() {
        let handler = Arc::new(CountingHandler::default());
        let skill = Skill::builder()
            .add_request_interceptor(Arc::new(FailingInterceptor))
            .add_request_handler(handler.clone())
            .build();

        let result = skill.invoke(launch_request()).await;
        assert!(matches!(result, Err(SkillError::InvalidRequest { .. })));
        assert_eq!(handler.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failing_error_handler_counts_as_unhandled() {
        let skill = Skill::builder()
            .add_request_handler(Arc::new(FailingHandler))
            .add_error_handler(Arc::new(BrokenErrorHandler))
            .build();

        let before = metrics().get_metrics().requests.errors_unhandled;
        let result = skill.invoke(launch_request()).await;

        assert!(matches!(result, Err(SkillError::InternalError { .. })));
        assert!(metrics().get_metrics().requests.errors_unhandled > before);
    }

    #[test]
    fn test_handler_names_preserve_order() {
        let skill = Skill::builder()
            .add_request_handlers([
                Arc::new(FixedHandler {
                    name: "A",
                    intent: None,
                    speech: "",
                }) as Arc<dyn RequestHandler>,
                Arc::new(FailingHandler),
            ])
            .build();

        assert_eq!(skill.handler_names(), vec!["A", "FailingHandler"]);
    }
}
