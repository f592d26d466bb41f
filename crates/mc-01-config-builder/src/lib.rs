//! # MC-01 Config Builder
//!
//! Computes the per-subsystem configuration bundle (mconfigs) for one
//! managed gateway from its network and the network's entity graph.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): Pure business logic, no I/O
//!   - `EntityGraph`: Validated, read-only graph with ancestor lookup
//!   - `assemblers`: One pure function per managed subsystem
//!   - `Mconfig`: Closed set of subsystem config outputs
//!   - `ConfigsByKey`: Collision-checked output map
//!   - `jitter_u32`: Deterministic per-gateway interval spreading
//!
//! - **Ports Layer** (`ports/`): Trait definitions
//!   - `MconfigBuilder`: Plugin port, one per builder
//!   - `BuildServiceApi`: Driving port (inbound API)
//!
//! - **Service Layer** (`service/`): Orchestration
//!   - `GatewayMconfigBuilder`: Base builder for every gateway
//!   - `BuildService`: Implements `BuildServiceApi`
//!
//! - **IPC Layer** (`ipc/`): bincode request/response handling
//!   - `BuildHandler`: Decodes `BuildRequest`, encodes `BuildResponse`
//!
//! ## Invariants
//!
//! - **Determinism**: identical inputs produce byte-identical outputs
//! - **No partial output**: any error aborts the whole build
//! - **Unique keys**: no output key is ever written twice
//!
//! ## Usage Example
//!
//! ```ignore
//! use mc_01_config_builder::{BuildService, BuildServiceApi, BuilderConfig};
//!
//! let service = BuildService::new(BuilderConfig::new("1.8.0"));
//! let configs = service.build(&network_wire, &graph_wire, "gw1")?;
//! let state = configs.get("state");
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod ipc;
pub mod ports;
pub mod service;

// Re-exports for convenience
pub use config::BuilderConfig;
pub use domain::{keys, ConfigsByKey, EntityGraph, Mconfig};
pub use error::{BuildError, BuildErrorKind, GraphError};
pub use ipc::{BuildFailure, BuildHandler, BuildRequest, BuildResponse};
pub use ports::{BuildServiceApi, MconfigBuilder};
pub use service::{BuildService, GatewayMconfigBuilder};
