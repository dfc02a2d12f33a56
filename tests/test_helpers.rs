//! Test helpers and utilities for integration tests

use name_steal_skill::protocol::{Card, ResponseEnvelope};
use serde_json::{Map, Value};

/// SSML of the main output speech
#[allow(dead_code)]
pub fn speech(envelope: &ResponseEnvelope) -> &str {
    envelope
        .response
        .output_speech
        .as_ref()
        .expect("response has output speech")
        .content()
}

/// SSML of the reprompt, if any
#[allow(dead_code)]
pub fn reprompt(envelope: &ResponseEnvelope) -> Option<&str> {
    envelope
        .response
        .reprompt
        .as_ref()
        .map(|r| r.output_speech.content())
}

/// Content of the Simple card, if any
#[allow(dead_code)]
pub fn card_content(envelope: &ResponseEnvelope) -> Option<&str> {
    match envelope.response.card.as_ref()? {
        Card::Simple { content, .. } => Some(content.as_str()),
    }
}

#[allow(dead_code)]
pub fn attributes(pairs: &[(&str, Value)]) -> Map<String, Value> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}
