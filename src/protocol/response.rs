//! Response envelope types and the response builder
//!
//! Speech is always emitted as SSML. Text handed to [`ResponseBuilder::speak`]
//! may or may not already carry an outer `<speak>` element; either way exactly
//! one wrapper ends up in the payload.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Response envelope returned to the voice platform
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_attributes: Option<Map<String, Value>>,
    pub user_agent: String,
    pub response: Response,
}

impl ResponseEnvelope {
    pub fn new(response: Response, session_attributes: Option<Map<String, Value>>) -> Self {
        Self {
            version: "1.0".to_string(),
            session_attributes,
            user_agent: user_agent(),
            response,
        }
    }
}

/// User agent advertised in every response envelope
pub fn user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_speech: Option<OutputSpeech>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<Reprompt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub should_end_session: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum OutputSpeech {
    #[serde(rename = "SSML")]
    Ssml { ssml: String },
    PlainText { text: String },
}

impl OutputSpeech {
    /// The raw speech markup or text
    pub fn content(&self) -> &str {
        match self {
            OutputSpeech::Ssml { ssml } => ssml,
            OutputSpeech::PlainText { text } => text,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Reprompt {
    pub output_speech: OutputSpeech,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Card {
    Simple { title: String, content: String },
}

static SPEAK_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*<speak>\s*").expect("speak open pattern is valid"));
static SPEAK_CLOSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*</speak>\s*$").expect("speak close pattern is valid"));

/// Trim whitespace and any outer `<speak>` element, then wrap once
fn wrap_ssml(speech: &str) -> String {
    let inner = SPEAK_OPEN.replace(speech, "");
    let inner = SPEAK_CLOSE.replace(&inner, "");
    format!("<speak>{}</speak>", inner.trim())
}

/// Escape text for interpolation into SSML markup
pub fn escape_ssml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Fluent builder for [`Response`]
///
/// # Examples
/// ```
/// use name_steal_skill::protocol::ResponseBuilder;
///
/// let response = ResponseBuilder::new()
///     .speak("契約書だよ。")
///     .reprompt("そこに名前を書きな。")
///     .get_response();
///
/// assert_eq!(response.output_speech.unwrap().content(), "<speak>契約書だよ。</speak>");
/// assert_eq!(response.should_end_session, Some(false));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ResponseBuilder {
    response: Response,
}

impl ResponseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn speak(mut self, speech: &str) -> Self {
        self.response.output_speech = Some(OutputSpeech::Ssml {
            ssml: wrap_ssml(speech),
        });
        self
    }

    /// Set reprompt speech; keeps the session open
    pub fn reprompt(mut self, speech: &str) -> Self {
        self.response.reprompt = Some(Reprompt {
            output_speech: OutputSpeech::Ssml {
                ssml: wrap_ssml(speech),
            },
        });
        self.response.should_end_session = Some(false);
        self
    }

    pub fn with_simple_card(mut self, title: &str, content: &str) -> Self {
        self.response.card = Some(Card::Simple {
            title: title.to_string(),
            content: content.to_string(),
        });
        self
    }

    pub fn with_should_end_session(mut self, should_end_session: bool) -> Self {
        self.response.should_end_session = Some(should_end_session);
        self
    }

    pub fn get_response(self) -> Response {
        self.response
    }
}
