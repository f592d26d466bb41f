//! Domain Layer - Pure business logic
//!
//! This layer contains:
//! - Entity graph view and ancestor traversal
//! - Subsystem config output types
//! - Per-subsystem assemblers
//! - Deterministic jitter
//! - Collision-checked output map
//!
//! RULES:
//! - No I/O operations
//! - No async code
//! - Pure functions where possible

pub mod assemblers;
pub mod configs;
pub mod graph;
pub mod jitter;
pub mod mconfigs;

pub use configs::ConfigsByKey;
pub use graph::EntityGraph;
pub use jitter::{jitter_u32, STATE_SYNC_JITTER_FRACTION};
pub use mconfigs::*;
