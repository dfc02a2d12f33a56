//! The name-transform handler
//!
//! Takes the `Name` slot, keeps one random character of it and announces that
//! character as the user's new name. With a [`PhoneticConverter`] configured the
//! character's reading is fetched first and spoken through an SSML `<sub>`
//! alias, so a lone kanji is pronounced the way it would be read as a name.

use crate::error::{SkillError, SkillResult};
use crate::handlers::speech;
use crate::name::pick_character;
use crate::observability::metrics::metrics;
use crate::phonetic::PhoneticConverter;
use crate::phonetic_span;
use crate::protocol::{escape_ssml, Response};
use crate::skill::{HandlerInput, RequestHandler};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{debug, info, warn, Instrument};

pub const WRITE_NAME_INTENT: &str = "WriteNameIntent";
pub const NAME_SLOT: &str = "Name";

/// The stolen name in its two renderings
#[derive(Debug, Clone, PartialEq)]
pub struct NewName {
    /// SSML-ready markup
    pub spoken: String,
    /// Plain text for cards
    pub display: String,
}

pub struct WriteNameIntentHandler {
    converter: Option<Arc<dyn PhoneticConverter>>,
    rng: Mutex<StdRng>,
}

impl Default for WriteNameIntentHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl WriteNameIntentHandler {
    pub fn new() -> Self {
        Self {
            converter: None,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Speak the converter's reading of the stolen character
    pub fn with_converter(mut self, converter: Arc<dyn PhoneticConverter>) -> Self {
        self.converter = Some(converter);
        self
    }

    /// Deterministic character selection
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    fn pick(&self, name: &str) -> SkillResult<String> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| SkillError::internal_error("name selection RNG poisoned"))?;
        pick_character(name, &mut *rng).ok_or_else(|| SkillError::missing_slot(NAME_SLOT))
    }

    async fn render(&self, character: &str) -> SkillResult<NewName> {
        let Some(converter) = &self.converter else {
            return Ok(NewName {
                spoken: escape_ssml(character),
                display: character.to_string(),
            });
        };

        let start = Instant::now();
        let result = converter
            .convert(character)
            .instrument(phonetic_span!(converter = converter.name()))
            .await;
        metrics().phonetic_call(start.elapsed(), result.is_ok());

        let reading = result.map_err(|e| {
            warn!("Phonetic conversion via {} failed: {}", converter.name(), e);
            SkillError::from(e)
        })?;

        Ok(NewName {
            spoken: format!(
                r#"<sub alias="{}">{}</sub>"#,
                escape_ssml(&reading),
                escape_ssml(character)
            ),
            display: format!("{character}（{reading}）"),
        })
    }
}

#[async_trait]
impl RequestHandler for WriteNameIntentHandler {
    fn name(&self) -> &'static str {
        "WriteNameIntentHandler"
    }

    fn can_handle(&self, input: &HandlerInput) -> bool {
        input.is_intent(&[WRITE_NAME_INTENT])
    }

    async fn handle(&self, input: &HandlerInput) -> SkillResult<Response> {
        let name = input
            .slot_value(NAME_SLOT)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| SkillError::missing_slot(NAME_SLOT))?;
        debug!("Slot value (Name): {}", name);

        let character = self.pick(name)?;
        let new_name = self.render(&character).await?;
        info!("New name: {}", new_name.display);

        Ok(input
            .response_builder()
            .speak(&speech::name_stolen(name, &new_name.spoken))
            .reprompt(speech::RETRY_QUESTION)
            .with_simple_card(
                speech::NEW_NAME_CARD_TITLE,
                &speech::name_card(name, &new_name.display),
            )
            .get_response())
    }
}
