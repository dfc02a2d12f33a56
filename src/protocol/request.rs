//! Request envelope types
//!
//! Mirrors the host platform's request JSON. Only the fields the skill reads are
//! typed; `context` is kept as opaque JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Request envelope posted by the voice platform
///
/// # Examples
/// ```
/// use name_steal_skill::protocol::{RequestEnvelope, RequestKind};
///
/// let envelope: RequestEnvelope = serde_json::from_str(r#"{
///     "version": "1.0",
///     "request": {
///         "type": "IntentRequest",
///         "requestId": "amzn1.echo-api.request.1",
///         "timestamp": "2024-01-01T12:00:00Z",
///         "locale": "ja-JP",
///         "intent": {
///             "name": "WriteNameIntent",
///             "slots": { "Name": { "name": "Name", "value": "千尋" } }
///         }
///     }
/// }"#).unwrap();
///
/// assert_eq!(envelope.kind(), RequestKind::Intent);
/// assert_eq!(envelope.intent_name(), Some("WriteNameIntent"));
/// assert_eq!(envelope.slot_value("Name"), Some("千尋"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RequestEnvelope {
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<Session>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
    pub request: Request,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub new: bool,
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application: Option<Application>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub application_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: String,
}

/// The request body; `type` selects which optional fields are populated
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    #[serde(rename = "type")]
    pub request_type: String,
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<Intent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialog_state: Option<String>,
    /// SessionEndedRequest only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// SessionEndedRequest only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Intent {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation_status: Option<String>,
    #[serde(default)]
    pub slots: HashMap<String, Slot>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation_status: Option<String>,
}

/// Request types the handler chain distinguishes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestKind {
    Launch,
    Intent,
    SessionEnded,
    Other(String),
}

impl RequestKind {
    pub fn parse(request_type: &str) -> Self {
        match request_type {
            "LaunchRequest" => RequestKind::Launch,
            "IntentRequest" => RequestKind::Intent,
            "SessionEndedRequest" => RequestKind::SessionEnded,
            other => RequestKind::Other(other.to_string()),
        }
    }

    /// Label used for logging and metrics
    pub fn as_str(&self) -> &str {
        match self {
            RequestKind::Launch => "LaunchRequest",
            RequestKind::Intent => "IntentRequest",
            RequestKind::SessionEnded => "SessionEndedRequest",
            RequestKind::Other(other) => other,
        }
    }
}

impl RequestEnvelope {
    pub fn request_type(&self) -> &str {
        &self.request.request_type
    }

    pub fn kind(&self) -> RequestKind {
        RequestKind::parse(&self.request.request_type)
    }

    /// Intent name; `None` unless this is an IntentRequest
    pub fn intent_name(&self) -> Option<&str> {
        if self.kind() != RequestKind::Intent {
            return None;
        }
        self.request.intent.as_ref().map(|intent| intent.name.as_str())
    }

    /// Slot value; `None` when the slot is absent or was not filled
    pub fn slot_value(&self, slot_name: &str) -> Option<&str> {
        self.request
            .intent
            .as_ref()?
            .slots
            .get(slot_name)?
            .value
            .as_deref()
    }

    /// Application id from the session, falling back to `context.System.application`
    pub fn application_id(&self) -> Option<&str> {
        let from_session = self
            .session
            .as_ref()
            .and_then(|s| s.application.as_ref())
            .map(|a| a.application_id.as_str());

        from_session.or_else(|| {
            self.context
                .as_ref()?
                .pointer("/System/application/applicationId")?
                .as_str()
        })
    }

    /// Session attributes to echo back in the response
    pub fn session_attributes(&self) -> Option<&Map<String, Value>> {
        self.session.as_ref()?.attributes.as_ref()
    }

    pub fn is_new_session(&self) -> bool {
        self.session.as_ref().map(|s| s.new).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(value: Value) -> RequestEnvelope {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_launch_request_parses() {
        let env = envelope(json!({
            "version": "1.0",
            "session": {
                "new": true,
                "sessionId": "amzn1.echo-api.session.1",
                "application": { "applicationId": "amzn1.ask.skill.test" },
                "user": { "userId": "amzn1.ask.account.user" }
            },
            "request": {
                "type": "LaunchRequest",
                "requestId": "amzn1.echo-api.request.1",
                "timestamp": "2024-05-01T09:30:00Z",
                "locale": "ja-JP"
            }
        }));

        assert_eq!(env.kind(), RequestKind::Launch);
        assert_eq!(env.intent_name(), None);
        assert_eq!(env.application_id(), Some("amzn1.ask.skill.test"));
        assert!(env.is_new_session());
    }

    #[test]
    fn test_slot_without_value_is_none() {
        let env = envelope(json!({
            "version": "1.0",
            "request": {
                "type": "IntentRequest",
                "requestId": "r",
                "timestamp": "2024-05-01T09:30:00Z",
                "intent": {
                    "name": "WriteNameIntent",
                    "confirmationStatus": "NONE",
                    "slots": { "Name": { "name": "Name", "confirmationStatus": "NONE" } }
                }
            }
        }));

        assert_eq!(env.intent_name(), Some("WriteNameIntent"));
        assert_eq!(env.slot_value("Name"), None);
        assert_eq!(env.slot_value("Other"), None);
    }

    #[test]
    fn test_application_id_falls_back_to_context() {
        let env = envelope(json!({
            "version": "1.0",
            "context": {
                "System": { "application": { "applicationId": "amzn1.ask.skill.ctx" } }
            },
            "request": {
                "type": "SessionEndedRequest",
                "requestId": "r",
                "timestamp": "2024-05-01T09:30:00Z",
                "reason": "USER_INITIATED"
            }
        }));

        assert_eq!(env.kind(), RequestKind::SessionEnded);
        assert_eq!(env.application_id(), Some("amzn1.ask.skill.ctx"));
        assert_eq!(env.request.reason.as_deref(), Some("USER_INITIATED"));
    }

    #[test]
    fn test_unknown_request_type_is_other() {
        let kind = RequestKind::parse("CanFulfillIntentRequest");
        assert_eq!(kind, RequestKind::Other("CanFulfillIntentRequest".to_string()));
        assert_eq!(kind.as_str(), "CanFulfillIntentRequest");
    }

    #[test]
    fn test_intent_name_ignored_for_non_intent_requests() {
        let env = envelope(json!({
            "version": "1.0",
            "request": {
                "type": "LaunchRequest",
                "requestId": "r",
                "timestamp": "2024-05-01T09:30:00Z",
                "intent": { "name": "WriteNameIntent" }
            }
        }));

        assert_eq!(env.intent_name(), None);
    }
}
