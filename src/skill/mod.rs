//! Intent dispatcher
//!
//! Handler traits plus the [`Skill`] that runs an ordered handler chain over a
//! request envelope.

pub mod dispatcher;
pub mod handler;

pub use dispatcher::{Skill, SkillBuilder};
pub use handler::{ErrorHandler, HandlerInput, RequestHandler, RequestInterceptor};
