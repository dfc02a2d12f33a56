//! Request and response envelope types
//!
//! The wire format is the host voice platform's JSON schema; this module only
//! models it and provides the response builder.

pub mod request;
pub mod response;

pub use request::*;
pub use response::*;
