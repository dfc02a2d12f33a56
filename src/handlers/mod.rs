//! The name-steal skill's handlers
//!
//! [`standard_skill`] wires them in dispatch order. The intent reflector is
//! registered last because it claims every IntentRequest.

pub mod builtin;
pub mod contract;
pub mod fallback;
pub mod request_log;
pub mod speech;
pub mod write_name;

pub use builtin::{CancelAndStopIntentHandler, HelpIntentHandler, SessionEndedRequestHandler};
pub use contract::{LaunchRequestHandler, StealNameIntentHandler};
pub use fallback::{GenericErrorHandler, IntentReflectorHandler};
pub use request_log::RequestLog;
pub use write_name::{NewName, WriteNameIntentHandler};

use crate::phonetic::PhoneticConverter;
use crate::skill::{RequestHandler, Skill};
use std::sync::Arc;

/// Build the skill with every handler registered in order
pub fn standard_skill(
    application_id: Option<String>,
    converter: Option<Arc<dyn PhoneticConverter>>,
) -> Skill {
    let write_name = match converter {
        Some(converter) => WriteNameIntentHandler::new().with_converter(converter),
        None => WriteNameIntentHandler::new(),
    };

    let handlers: Vec<Arc<dyn RequestHandler>> = vec![
        Arc::new(LaunchRequestHandler),
        Arc::new(StealNameIntentHandler),
        Arc::new(write_name),
        Arc::new(HelpIntentHandler),
        Arc::new(CancelAndStopIntentHandler),
        Arc::new(SessionEndedRequestHandler),
        Arc::new(IntentReflectorHandler),
    ];

    Skill::builder()
        .with_application_id(application_id)
        .add_request_handlers(handlers)
        .add_error_handler(Arc::new(GenericErrorHandler))
        .add_request_interceptor(Arc::new(RequestLog))
        .build()
}
