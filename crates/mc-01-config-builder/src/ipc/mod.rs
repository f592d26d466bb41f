//! # IPC Layer
//!
//! Encoded request/response surface of the build service.

pub mod handler;
pub mod payloads;

pub use handler::*;
pub use payloads::*;
