//! Error types for the name-steal skill
//!
//! Every failure inside the dispatch chain is a [`SkillError`]. Errors raised by
//! handlers are offered to the registered error handlers; errors that escape the
//! skill are mapped to an HTTP-facing [`ErrorBody`] by the server.

use crate::config::ConfigError;
use crate::phonetic::PhoneticError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

/// Main error type for skill operations
#[derive(Debug, Error)]
pub enum SkillError {
    #[error("Unable to find a suitable request handler for {request_type} (intent: {})", intent.as_deref().unwrap_or("none"))]
    NoHandler {
        request_type: String,
        intent: Option<String>,
    },

    #[error("Required slot '{slot}' is missing or empty")]
    MissingSlot { slot: String },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Application id mismatch: expected {expected}, got {}", actual.as_deref().unwrap_or("none"))]
    ApplicationIdMismatch {
        expected: String,
        actual: Option<String>,
    },

    #[error("Request timestamp outside tolerance: skew {skew_secs}s exceeds {tolerance_secs}s")]
    StaleRequest { skew_secs: i64, tolerance_secs: u64 },

    #[error("Phonetic conversion failed: {0}")]
    Phonetic(#[from] PhoneticError),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

/// Error codes returned to the hosting platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidRequest,
    ApplicationMismatch,
    StaleRequest,
    SkillFailure,
    InternalError,
    NotFound,
    MethodNotAllowed,
    LengthRequired,
    PayloadTooLarge,
}

/// JSON body for requests the skill refuses or cannot answer
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetails,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetails {
    pub code: ErrorCode,
    pub message: String,
}

impl SkillError {
    /// Map to an error code and HTTP status for the endpoint response
    pub fn code(&self) -> (ErrorCode, u16) {
        match self {
            SkillError::InvalidRequest { .. } => (ErrorCode::InvalidRequest, 400),
            SkillError::ApplicationIdMismatch { .. } => (ErrorCode::ApplicationMismatch, 400),
            SkillError::StaleRequest { .. } => (ErrorCode::StaleRequest, 400),
            SkillError::NoHandler { .. }
            | SkillError::MissingSlot { .. }
            | SkillError::Phonetic(_) => (ErrorCode::SkillFailure, 500),
            SkillError::ConfigError(_) | SkillError::InternalError { .. } => {
                (ErrorCode::InternalError, 500)
            }
        }
    }

    /// Convert to a sanitized error body
    pub fn to_error_body(&self) -> ErrorBody {
        let (code, _) = self.code();
        ErrorBody {
            error: ErrorDetails {
                code,
                message: sanitize_error_message(&self.to_string()),
            },
        }
    }

    /// Create no-handler error
    pub fn no_handler<S: Into<String>>(request_type: S, intent: Option<&str>) -> Self {
        Self::NoHandler {
            request_type: request_type.into(),
            intent: intent.map(str::to_string),
        }
    }

    /// Create missing slot error
    pub fn missing_slot<S: Into<String>>(slot: S) -> Self {
        Self::MissingSlot { slot: slot.into() }
    }

    /// Create invalid request error
    pub fn invalid_request<S: Into<String>>(message: S) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create internal error
    pub fn internal_error<S: Into<String>>(message: S) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }
}

static SECRET_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(password|token|key|secret|app_id)[=:]\s*[^\s&]+")
        .expect("secret pattern is valid")
});

static SENSITIVE_PATH_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"/[a-zA-Z0-9._/-]+/(secrets?|\.ssh|\.aws|\.config)/[a-zA-Z0-9._/-]+")
        .expect("path pattern is valid")
});

const MAX_ERROR_MESSAGE_LEN: usize = 500;

/// Redact credentials and sensitive paths, then truncate to 500 bytes
pub fn sanitize_error_message(message: &str) -> String {
    let sanitized = SECRET_PATTERN.replace_all(message, "${1}=***");
    let mut sanitized = SENSITIVE_PATH_PATTERN
        .replace_all(&sanitized, "/***REDACTED***/")
        .to_string();

    if sanitized.len() > MAX_ERROR_MESSAGE_LEN {
        let truncate_suffix = "...[truncated]";
        let mut cut = MAX_ERROR_MESSAGE_LEN - truncate_suffix.len();
        // Names are mostly multi-byte; never split a character
        while !sanitized.is_char_boundary(cut) {
            cut -= 1;
        }
        sanitized.truncate(cut);
        sanitized.push_str(truncate_suffix);
    }

    sanitized
}

/// Result type for skill operations
pub type SkillResult<T> = Result<T, SkillError>;
