//! Observability for the skill endpoint
//!
//! Structured logging via tracing and an in-process metrics collector.

pub mod logging;
pub mod metrics;

// Re-export for convenience
pub use logging::{
    init_default_logging, init_logging, init_logging_with_verbosity, parse_level, LogFormat,
};
pub use metrics::{metrics, MetricsCollector, MetricsSnapshot};

// Span macros for structured logging
pub use logging::{handler_span, phonetic_span, request_span};
