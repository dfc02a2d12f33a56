//! Mock implementations and request fixtures for testing
//!
//! Provides a scripted [`PhoneticConverter`] and request envelope builders so
//! the handler chain can be exercised without the network or a real device.

use crate::phonetic::{PhoneticConverter, PhoneticError};
use crate::protocol::{Application, Intent, Request, RequestEnvelope, Session, Slot, User};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

pub const TEST_APPLICATION_ID: &str = "amzn1.ask.skill.test";

/// Mock phonetic converter for testing
///
/// Known inputs return their scripted reading; anything else is echoed back.
#[derive(Debug, Default)]
pub struct MockPhoneticConverter {
    readings: HashMap<String, String>,
    pub requests: Arc<Mutex<Vec<String>>>,
    pub should_fail: bool,
}

impl MockPhoneticConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_failure() -> Self {
        Self {
            should_fail: true,
            ..Default::default()
        }
    }

    pub fn with_reading(mut self, text: &str, reading: &str) -> Self {
        self.readings.insert(text.to_string(), reading.to_string());
        self
    }

    /// Texts passed to `convert`, in call order
    pub async fn requests(&self) -> Vec<String> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl PhoneticConverter for MockPhoneticConverter {
    fn name(&self) -> &str {
        "mock"
    }

    async fn convert(&self, text: &str) -> Result<String, PhoneticError> {
        self.requests.lock().await.push(text.to_string());

        if self.should_fail {
            return Err(PhoneticError::Network("mock converter failure".to_string()));
        }

        Ok(self
            .readings
            .get(text)
            .cloned()
            .unwrap_or_else(|| text.to_string()))
    }
}

fn envelope(request: Request) -> RequestEnvelope {
    RequestEnvelope {
        version: "1.0".to_string(),
        session: Some(Session {
            new: request.request_type == "LaunchRequest",
            session_id: format!("amzn1.echo-api.session.{}", Uuid::new_v4()),
            application: Some(Application {
                application_id: TEST_APPLICATION_ID.to_string(),
            }),
            attributes: None,
            user: Some(User {
                user_id: "amzn1.ask.account.test".to_string(),
            }),
        }),
        context: Some(json!({
            "System": { "application": { "applicationId": TEST_APPLICATION_ID } }
        })),
        request,
    }
}

fn request(request_type: &str) -> Request {
    Request {
        request_type: request_type.to_string(),
        request_id: format!("amzn1.echo-api.request.{}", Uuid::new_v4()),
        timestamp: Utc::now(),
        locale: Some("ja-JP".to_string()),
        intent: None,
        dialog_state: None,
        reason: None,
        error: None,
    }
}

pub fn launch_request() -> RequestEnvelope {
    envelope(request("LaunchRequest"))
}

/// IntentRequest with the given filled slots
pub fn intent_request(name: &str, slots: &[(&str, &str)]) -> RequestEnvelope {
    let mut request = request("IntentRequest");
    request.intent = Some(Intent {
        name: name.to_string(),
        confirmation_status: Some("NONE".to_string()),
        slots: slots
            .iter()
            .map(|(slot, value)| {
                (
                    slot.to_string(),
                    Slot {
                        name: slot.to_string(),
                        value: Some(value.to_string()),
                        confirmation_status: Some("NONE".to_string()),
                    },
                )
            })
            .collect(),
    });
    envelope(request)
}

pub fn session_ended_request(reason: &str) -> RequestEnvelope {
    let mut request = request("SessionEndedRequest");
    request.reason = Some(reason.to_string());
    envelope(request)
}
