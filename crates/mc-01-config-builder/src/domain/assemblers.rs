//! Per-subsystem assemblers
//!
//! Pure functions mapping the gateway, its ancestors and the network's
//! configs to a fully populated subsystem config. Defaults apply wherever
//! the source data is absent.
//!
//! RULES:
//! - No I/O
//! - No shared state
//! - Only an ancestor lookup miss may be absorbed; every other graph error
//!   propagates

use std::collections::BTreeMap;

use shared_types::{GatewayConfig, Network, NetworkEntity, UPGRADE_TIER_ENTITY_TYPE};
use tracing::{debug, warn};

use crate::domain::graph::EntityGraph;
use crate::domain::jitter::{jitter_u32, STATE_SYNC_JITTER_FRACTION};
use crate::domain::mconfigs::*;
use crate::error::GraphError;

/// Package version for gateways outside any upgrade tier.
pub const DEFAULT_PACKAGE_VERSION: &str = "0.0.0-0";

pub const DEFAULT_THROTTLE_RATE: u32 = 1000;
pub const DEFAULT_THROTTLE_WINDOW: u32 = 5;
pub const DEFAULT_THROTTLE_INTERVAL: &str = "1m";

/// Log every event.
pub const DEFAULT_EVENT_VERBOSITY: i32 = -1;

/// Base state sync interval in seconds, before jitter.
pub const DEFAULT_SYNC_INTERVAL: u32 = 60;

// =============================================================================
// GATEWAY-DEPENDENT
// =============================================================================

/// Version and images from the nearest upgrade tier above `gateway`.
///
/// A gateway need not belong to a tier: a lookup miss yields the default
/// version and no images.
pub fn package_version_and_images(
    gateway: &NetworkEntity,
    graph: &EntityGraph,
) -> Result<(String, Vec<ImageSpec>), GraphError> {
    let tier = match graph.get_first_ancestor_of_type(gateway, UPGRADE_TIER_ENTITY_TYPE) {
        Ok(tier) => tier,
        Err(e) if e.is_not_found() => {
            debug!(gateway = %gateway.id, "no upgrade tier ancestor, using default package version");
            return Ok((DEFAULT_PACKAGE_VERSION.to_string(), Vec::new()));
        }
        Err(e) => return Err(e),
    };

    let Some(tier_config) = tier.tier_config() else {
        warn!(tier = %tier.id, "upgrade tier has no config, using default package version");
        return Ok((DEFAULT_PACKAGE_VERSION.to_string(), Vec::new()));
    };

    let images = tier_config
        .images
        .iter()
        .map(|image| ImageSpec {
            name: image.name.clone(),
            order: image.order,
        })
        .collect();
    Ok((tier_config.version.clone(), images))
}

pub fn device_agent_config(
    gateway: &NetworkEntity,
    gateway_config: &GatewayConfig,
    graph: &EntityGraph,
    version_tag: &str,
) -> Result<DeviceAgentConfig, GraphError> {
    let (package_version, images) = package_version_and_images(gateway, graph)?;

    Ok(DeviceAgentConfig {
        log_level: LogLevel::Info,
        checkin_interval: gateway_config.checkin_interval,
        checkin_timeout: gateway_config.checkin_timeout,
        autoupgrade_enabled: gateway_config.autoupgrade_enabled.unwrap_or(false),
        autoupgrade_poll_interval: gateway_config.autoupgrade_poll_interval,
        package_version,
        images,
        dynamic_services: gateway_config.dynamic_services.clone(),
        feature_flags: gateway_config.feature_flags.clone(),
        orc8r_version: version_tag.to_string(),
    })
}

pub fn log_shipping_config(
    network_id: &str,
    gateway_id: &str,
    gateway_config: &GatewayConfig,
) -> LogShippingConfig {
    let mut config = LogShippingConfig {
        extra_tags: BTreeMap::from([
            ("network_id".to_string(), network_id.to_string()),
            ("gateway_id".to_string(), gateway_id.to_string()),
        ]),
        throttle_rate: DEFAULT_THROTTLE_RATE,
        throttle_window: DEFAULT_THROTTLE_WINDOW,
        throttle_interval: DEFAULT_THROTTLE_INTERVAL.to_string(),
        files_by_tag: BTreeMap::new(),
    };

    let aggregation = gateway_config
        .logging
        .as_ref()
        .and_then(|logging| logging.aggregation.as_ref());
    if let Some(aggregation) = aggregation {
        config.files_by_tag = aggregation.target_files_by_tag.clone();
        if let Some(rate) = aggregation.throttle_rate {
            config.throttle_rate = rate;
        }
        if let Some(window) = aggregation.throttle_window {
            config.throttle_window = window;
        }
        if let Some(interval) = &aggregation.throttle_interval {
            config.throttle_interval = interval.clone();
        }
    }

    config
}

pub fn event_logging_config(gateway_config: &GatewayConfig) -> EventLoggingConfig {
    let event_verbosity = gateway_config
        .logging
        .as_ref()
        .and_then(|logging| logging.event_verbosity)
        .unwrap_or(DEFAULT_EVENT_VERBOSITY);

    EventLoggingConfig {
        log_level: LogLevel::Info,
        event_verbosity,
    }
}

pub fn vpn_config(gateway_config: &GatewayConfig) -> VpnConfig {
    VpnConfig {
        enable_shell_access: gateway_config
            .vpn
            .as_ref()
            .map_or(false, |vpn| vpn.enable_shell),
    }
}

// =============================================================================
// ALWAYS EMITTED
// =============================================================================

pub fn control_proxy_config() -> ControlProxyConfig {
    ControlProxyConfig {
        log_level: LogLevel::Info,
    }
}

pub fn metrics_config() -> MetricsConfig {
    MetricsConfig {
        log_level: LogLevel::Info,
    }
}

/// Network sync interval (or the default), jittered by gateway ID.
pub fn state_sync_config(network: &Network, gateway_id: &str) -> StateSyncConfig {
    let base = network
        .state_config()
        .map_or(DEFAULT_SYNC_INTERVAL, |state| state.sync_interval);

    StateSyncConfig {
        log_level: LogLevel::Info,
        sync_interval: jitter_u32(base, gateway_id, STATE_SYNC_JITTER_FRACTION),
    }
}

/// Telemetry stays `None` unless the network registers a sentry config.
pub fn shared_runtime_config(network: &Network) -> SharedRuntimeConfig {
    let error_telemetry = network.sentry_config().map(|sentry| ErrorTelemetryConfig {
        sample_rate: sentry.sample_rate.unwrap_or(0.0),
        upload_mme_log: sentry.upload_mme_log,
        dsn_native: sentry.url_native.clone(),
        dsn_python: sentry.url_python.clone(),
        exclusion_patterns: sentry.exclusion_patterns.clone(),
    });

    SharedRuntimeConfig { error_telemetry }
}
