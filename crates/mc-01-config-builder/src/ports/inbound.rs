//! Inbound Ports (Driving Ports)
//!
//! These traits define the API that callers and builder plugins use to
//! interact with the mconfig builder.

use shared_types::{EntityGraphWire, Network, NetworkWire};

use crate::domain::{ConfigsByKey, EntityGraph};
use crate::error::BuildError;

/// A set of assemblers contributing configs for one gateway.
///
/// Implementations must be pure: identical inputs yield identical outputs,
/// and nothing is shared mutably between calls.
pub trait MconfigBuilder: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Build this builder's configs for `gateway_id`.
    ///
    /// # Arguments
    /// * `network` - Decoded network and its configs
    /// * `graph` - Decoded, validated entity graph of the network
    /// * `gateway_id` - Key of the gateway entity
    fn build(
        &self,
        network: &Network,
        graph: &EntityGraph,
        gateway_id: &str,
    ) -> Result<ConfigsByKey, BuildError>;
}

/// Primary build API (Driving Port)
pub trait BuildServiceApi: Send + Sync {
    /// Decode the wire forms, run every registered builder and merge the
    /// results. Any error aborts the whole build.
    fn build(
        &self,
        network: &NetworkWire,
        graph: &EntityGraphWire,
        gateway_id: &str,
    ) -> Result<ConfigsByKey, BuildError>;
}
