//! Ports Layer - Trait definitions
//!
//! - `MconfigBuilder`: plugin port implemented by each assembler set
//! - `BuildServiceApi`: driving port implemented by `BuildService`

pub mod inbound;

pub use inbound::{BuildServiceApi, MconfigBuilder};
