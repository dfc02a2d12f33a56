//! Testing utilities and mock implementations
//!
//! Request envelope fixtures and a scripted phonetic converter, so the skill
//! can be tested without the voice platform or the reading API.

pub mod mocks;

pub use mocks::*;
