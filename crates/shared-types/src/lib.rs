//! # Shared Types Crate
//!
//! This crate contains the data model the mconfig builder consumes: networks,
//! network entities and their typed configs, plus the wire forms the entity
//! storage service hands over.
//!
//! ## Design Principles
//!
//! - **Closed Config Unions**: Entity and network configs are decoded exactly
//!   once, keyed by entity type or config kind, into `EntityConfig` and
//!   `NetworkConfig`. Consumers never cast.
//! - **Wire/Native Split**: `*Wire` types carry raw config bytes; native types
//!   carry decoded values. Conversion happens in `from_wire`/`to_wire`.
//! - **Deterministic Layout**: All maps are ordered so that anything derived
//!   from these types serializes byte-for-byte identically.

pub mod dns;
pub mod entities;
pub mod errors;
pub mod wire;

pub use dns::{DnsRecord, NetworkDnsConfig};
pub use entities::*;
pub use errors::*;
pub use wire::*;
