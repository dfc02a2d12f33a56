//! Name-steal voice skill
//!
//! A voice-assistant skill in which a bathhouse owner takes the user's name
//! and hands back a single character of it as their new name.
//!
//! # Overview
//!
//! This crate provides:
//! - Request/response envelope types and an SSML response builder
//! - An ordered handler chain with interceptors and error handlers
//! - The skill's handlers, including the name-transform handler
//! - An optional phonetic converter backed by the goo labs hiragana API
//! - A warp HTTP endpoint with health and metrics routes
//!
//! # Quick Start
//!
//! ```rust
//! use name_steal_skill::handlers::standard_skill;
//! use name_steal_skill::protocol::RequestEnvelope;
//!
//! let envelope: RequestEnvelope = serde_json::from_str(r#"{
//!     "version": "1.0",
//!     "request": {
//!         "type": "LaunchRequest",
//!         "requestId": "amzn1.echo-api.request.1",
//!         "timestamp": "2024-01-01T12:00:00Z"
//!     }
//! }"#).unwrap();
//!
//! let skill = standard_skill(None, None);
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! let response = runtime.block_on(skill.invoke(envelope)).unwrap();
//!
//! assert_eq!(response.response.should_end_session, Some(false));
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod name;
pub mod observability;
pub mod phonetic;
pub mod protocol;
pub mod server;
pub mod skill;
pub mod testing;

pub use config::*;
pub use error::{SkillError, SkillResult};
pub use handlers::standard_skill;
pub use phonetic::{PhoneticConverter, PhoneticError};
pub use protocol::*;
pub use server::SkillServer;
pub use skill::{Skill, SkillBuilder};
