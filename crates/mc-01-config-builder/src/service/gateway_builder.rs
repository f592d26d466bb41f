//! Base gateway builder
//!
//! Produces the orchestrator-owned subsystem configs for one gateway:
//!
//! 1. Look up the gateway (missing gateway aborts the build)
//! 2. If it carries a config bundle: device agent, log shipping, event
//!    logging, VPN
//! 3. Always: control proxy, metrics, state sync, shared runtime
//! 4. Serialize each and collect under its key, rejecting duplicates

use shared_types::{Network, GATEWAY_ENTITY_TYPE};
use tracing::debug;

use crate::config::BuilderConfig;
use crate::domain::assemblers;
use crate::domain::{ConfigsByKey, EntityGraph, Mconfig};
use crate::error::BuildError;
use crate::ports::MconfigBuilder;

/// Builder for the configs every managed gateway receives
#[derive(Debug, Clone)]
pub struct GatewayMconfigBuilder {
    config: BuilderConfig,
}

impl GatewayMconfigBuilder {
    pub fn new(config: BuilderConfig) -> Self {
        Self { config }
    }

    pub fn version_tag(&self) -> &str {
        &self.config.version_tag
    }

    /// Compute every config for `gateway_id` without serializing.
    pub fn assemble(
        &self,
        network: &Network,
        graph: &EntityGraph,
        gateway_id: &str,
    ) -> Result<Vec<Mconfig>, BuildError> {
        let network_id = network.id.as_str();
        let gateway = graph
            .get_entity(GATEWAY_ENTITY_TYPE, gateway_id)
            .map_err(|_| BuildError::GatewayNotFound {
                network_id: network_id.to_string(),
                gateway_id: gateway_id.to_string(),
            })?;

        let mut configs = Vec::with_capacity(8);

        if let Some(gateway_config) = gateway.gateway_config() {
            let device_agent = assemblers::device_agent_config(
                gateway,
                gateway_config,
                graph,
                &self.config.version_tag,
            )
            .map_err(|source| BuildError::UpgradeTier {
                gateway_id: gateway_id.to_string(),
                source,
            })?;
            configs.push(Mconfig::DeviceAgent(device_agent));
            configs.push(Mconfig::LogShipping(assemblers::log_shipping_config(
                network_id,
                gateway_id,
                gateway_config,
            )));
            configs.push(Mconfig::EventLogging(assemblers::event_logging_config(
                gateway_config,
            )));
            configs.push(Mconfig::Vpn(assemblers::vpn_config(gateway_config)));
        } else {
            debug!(gateway_id, "gateway has no config bundle, skipping gateway-dependent configs");
        }

        configs.push(Mconfig::ControlProxy(assemblers::control_proxy_config()));
        configs.push(Mconfig::Metrics(assemblers::metrics_config()));
        configs.push(Mconfig::StateSync(assemblers::state_sync_config(
            network, gateway_id,
        )));
        configs.push(Mconfig::SharedRuntime(assemblers::shared_runtime_config(
            network,
        )));

        Ok(configs)
    }
}

impl MconfigBuilder for GatewayMconfigBuilder {
    fn name(&self) -> &str {
        "gateway"
    }

    fn build(
        &self,
        network: &Network,
        graph: &EntityGraph,
        gateway_id: &str,
    ) -> Result<ConfigsByKey, BuildError> {
        let configs = self.assemble(network, graph, gateway_id)?;
        ConfigsByKey::marshal(configs)
    }
}
