//! Phonetic conversion abstraction
//!
//! A [`PhoneticConverter`] turns written text (typically a single kanji taken
//! from the user's name) into its kana reading. The name handler depends on the
//! trait only, so the network client can be swapped for a mock in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

pub mod goo;

pub use goo::{GooHiraganaClient, GooHiraganaConfig};

/// Phonetic converter trait for dependency injection and testing
#[async_trait]
pub trait PhoneticConverter: Send + Sync {
    /// Converter name for logging (e.g., "goo")
    fn name(&self) -> &str;

    /// Convert `text` to its reading
    async fn convert(&self, text: &str) -> Result<String, PhoneticError>;
}

/// Reading script requested from the converter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputType {
    #[default]
    Hiragana,
    Katakana,
}

impl OutputType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputType::Hiragana => "hiragana",
            OutputType::Katakana => "katakana",
        }
    }
}

impl FromStr for OutputType {
    type Err = PhoneticError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hiragana" => Ok(OutputType::Hiragana),
            "katakana" => Ok(OutputType::Katakana),
            other => Err(PhoneticError::NotConfigured(format!(
                "unsupported output type '{other}'"
            ))),
        }
    }
}

/// Phonetic conversion errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PhoneticError {
    #[error("Converter not configured: {0}")]
    NotConfigured(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}
