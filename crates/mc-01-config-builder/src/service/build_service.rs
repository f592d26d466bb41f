//! Build Service
//!
//! Facade over the registered builders. Decodes the wire network and graph
//! once, runs every builder against the native forms and merges their
//! outputs. A key produced twice, by one builder or across builders, aborts
//! the build instead of overwriting.

use std::sync::Arc;

use shared_types::{EntityGraphWire, Network, NetworkWire};
use tracing::{debug, info_span, warn};

use crate::config::BuilderConfig;
use crate::domain::{ConfigsByKey, EntityGraph};
use crate::error::BuildError;
use crate::ports::{BuildServiceApi, MconfigBuilder};
use crate::service::GatewayMconfigBuilder;

/// Build service implementation
///
/// Holds only immutable state, so one instance can serve any number of
/// concurrent builds behind an `Arc`.
pub struct BuildService {
    builders: Vec<Arc<dyn MconfigBuilder>>,
}

impl BuildService {
    /// Create a service with the base gateway builder registered.
    pub fn new(config: BuilderConfig) -> Self {
        Self {
            builders: vec![Arc::new(GatewayMconfigBuilder::new(config))],
        }
    }

    /// Create a service with exactly `builders`, in order.
    pub fn with_builders(builders: Vec<Arc<dyn MconfigBuilder>>) -> Self {
        Self { builders }
    }

    /// Register an additional builder.
    pub fn register(mut self, builder: Arc<dyn MconfigBuilder>) -> Self {
        self.builders.push(builder);
        self
    }

    pub fn builder_names(&self) -> Vec<&str> {
        self.builders.iter().map(|b| b.name()).collect()
    }

    /// Run every builder against already-decoded inputs.
    pub fn build_native(
        &self,
        network: &Network,
        graph: &EntityGraph,
        gateway_id: &str,
    ) -> Result<ConfigsByKey, BuildError> {
        let mut merged = ConfigsByKey::new();
        for builder in &self.builders {
            let configs = builder.build(network, graph, gateway_id)?;
            debug!(builder = builder.name(), count = configs.len(), "builder finished");
            merged.merge(configs)?;
        }
        Ok(merged)
    }
}

impl BuildServiceApi for BuildService {
    fn build(
        &self,
        network: &NetworkWire,
        graph: &EntityGraphWire,
        gateway_id: &str,
    ) -> Result<ConfigsByKey, BuildError> {
        let span = info_span!("mconfig_build", network_id = %network.id, gateway_id);
        let _enter = span.enter();

        let result = decode_inputs(network, graph)
            .and_then(|(network, graph)| self.build_native(&network, &graph, gateway_id));

        match &result {
            Ok(configs) => debug!(keys = configs.len(), "build complete"),
            Err(e) => warn!(kind = ?e.kind(), error = %e, "build failed"),
        }
        result
    }
}

fn decode_inputs(
    network: &NetworkWire,
    graph: &EntityGraphWire,
) -> Result<(Network, EntityGraph), BuildError> {
    let native_graph =
        EntityGraph::from_wire(graph).map_err(|source| BuildError::GraphDecode {
            network_id: network.id.clone(),
            source,
        })?;
    let native_network =
        Network::from_wire(network).map_err(|source| BuildError::NetworkDecode {
            network_id: network.id.clone(),
            source,
        })?;
    Ok((native_network, native_graph))
}
