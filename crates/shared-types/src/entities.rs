//! # Core Domain Entities
//!
//! Defines the networks, network entities and typed configs that the mconfig
//! builder reads.
//!
//! ## Clusters
//!
//! - **Identity**: `EntityId`, entity type and config kind names
//! - **Entity Configs**: `GatewayConfig`, `Tier`
//! - **Network Configs**: `StateConfig`, `NetworkSentryConfig`, `NetworkDnsConfig`
//! - **Containers**: `NetworkEntity`, `Network`

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dns::NetworkDnsConfig;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// Entity type of a managed gateway.
pub const GATEWAY_ENTITY_TYPE: &str = "magmad_gateway";

/// Entity type of an upgrade tier (release channel).
pub const UPGRADE_TIER_ENTITY_TYPE: &str = "upgrade_tier";

/// Network config kind holding the state-sync config.
pub const STATE_CONFIG_KIND: &str = "state_config";

/// Network config kind holding the crash/error telemetry config.
pub const SENTRY_CONFIG_KIND: &str = "sentry_config";

/// Network config kind holding the DNS resource.
pub const DNS_CONFIG_KIND: &str = "dns_config";

/// Identifies an entity within a network.
///
/// Ordering is by type first, then key, which is the tie-break order used by
/// graph traversal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId {
    /// Entity type, e.g. `magmad_gateway`.
    pub entity_type: String,
    /// Key, unique among entities of the same type.
    pub key: String,
}

impl EntityId {
    /// Create an ID from a type and key.
    pub fn new(entity_type: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            key: key.into(),
        }
    }

    /// Gateway ID for `key`.
    pub fn gateway(key: impl Into<String>) -> Self {
        Self::new(GATEWAY_ENTITY_TYPE, key)
    }

    /// Upgrade tier ID for `key`.
    pub fn upgrade_tier(key: impl Into<String>) -> Self {
        Self::new(UPGRADE_TIER_ENTITY_TYPE, key)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.entity_type, self.key)
    }
}

// =============================================================================
// CLUSTER B: ENTITY CONFIGS
// =============================================================================

/// Config bundle attached to a gateway entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Seconds between checkins.
    pub checkin_interval: i32,
    /// Checkin timeout in seconds.
    pub checkin_timeout: i32,
    /// Whether autoupgrade is on. Absent means off.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autoupgrade_enabled: Option<bool>,
    /// Seconds between upgrade polls.
    #[serde(default)]
    pub autoupgrade_poll_interval: i32,
    /// Services started on demand.
    #[serde(default)]
    pub dynamic_services: Vec<String>,
    /// Named feature toggles.
    #[serde(default)]
    pub feature_flags: BTreeMap<String, bool>,
    /// Logging overrides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<GatewayLoggingConfig>,
    /// VPN settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vpn: Option<GatewayVpnConfig>,
}

/// Gateway logging overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GatewayLoggingConfig {
    /// Log shipping overrides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<AggregationLoggingConfig>,
    /// Event logging verbosity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_verbosity: Option<i32>,
}

/// Log shipping overrides. Every throttle field is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregationLoggingConfig {
    /// File to ship per log tag.
    #[serde(default)]
    pub target_files_by_tag: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub throttle_rate: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub throttle_window: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub throttle_interval: Option<String>,
}

/// Gateway VPN settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayVpnConfig {
    /// Allow shell access over the VPN.
    pub enable_shell: bool,
}

/// Config of an upgrade tier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    /// Human readable tier name.
    #[serde(default)]
    pub name: String,
    /// Package version gateways in this tier should run.
    pub version: String,
    /// Container images, in delivery order.
    #[serde(default)]
    pub images: Vec<TierImage>,
}

/// An image artifact of an upgrade tier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierImage {
    pub name: String,
    pub order: i64,
}

/// Typed config of a network entity, keyed by entity type.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityConfig {
    /// Config of a `magmad_gateway` entity.
    Gateway(GatewayConfig),
    /// Config of an `upgrade_tier` entity.
    UpgradeTier(Tier),
}

impl EntityConfig {
    /// Entity type this config belongs to.
    pub fn entity_type(&self) -> &'static str {
        match self {
            Self::Gateway(_) => GATEWAY_ENTITY_TYPE,
            Self::UpgradeTier(_) => UPGRADE_TIER_ENTITY_TYPE,
        }
    }
}

// =============================================================================
// CLUSTER C: NETWORK CONFIGS
// =============================================================================

/// Network-wide state sync settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateConfig {
    /// Base sync interval in seconds, before jitter.
    pub sync_interval: u32,
}

/// Network-wide crash/error telemetry settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkSentryConfig {
    /// Fraction of events to upload. Absent means 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<f32>,
    /// Upload control-plane logs with crash reports.
    #[serde(default)]
    pub upload_mme_log: bool,
    /// Destination for native services.
    #[serde(default)]
    pub url_native: String,
    /// Destination for python services.
    #[serde(default)]
    pub url_python: String,
    /// Event messages matching any pattern are dropped.
    #[serde(default)]
    pub exclusion_patterns: Vec<String>,
}

/// Typed network config, keyed by config kind.
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkConfig {
    State(StateConfig),
    Sentry(NetworkSentryConfig),
    Dns(NetworkDnsConfig),
}

impl NetworkConfig {
    /// Config kind this value is stored under.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::State(_) => STATE_CONFIG_KIND,
            Self::Sentry(_) => SENTRY_CONFIG_KIND,
            Self::Dns(_) => DNS_CONFIG_KIND,
        }
    }
}

// =============================================================================
// CLUSTER D: CONTAINERS
// =============================================================================

/// An entity of a network's entity graph.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkEntity {
    /// Owning network.
    pub network_id: String,
    /// Type and key.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Hardware identifier, for entities backed by a device.
    pub physical_id: Option<String>,
    /// Decoded config, if any.
    pub config: Option<EntityConfig>,
}

impl NetworkEntity {
    /// Create an entity without a config.
    pub fn new(network_id: impl Into<String>, id: EntityId) -> Self {
        Self {
            network_id: network_id.into(),
            id,
            name: String::new(),
            physical_id: None,
            config: None,
        }
    }

    /// Attach a config.
    pub fn with_config(mut self, config: EntityConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the physical ID.
    pub fn with_physical_id(mut self, physical_id: impl Into<String>) -> Self {
        self.physical_id = Some(physical_id.into());
        self
    }

    /// Gateway config bundle, if this entity carries one.
    pub fn gateway_config(&self) -> Option<&GatewayConfig> {
        match &self.config {
            Some(EntityConfig::Gateway(config)) => Some(config),
            _ => None,
        }
    }

    /// Upgrade tier config, if this entity carries one.
    pub fn tier_config(&self) -> Option<&Tier> {
        match &self.config {
            Some(EntityConfig::UpgradeTier(tier)) => Some(tier),
            _ => None,
        }
    }
}

/// A network and its network-level configs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Network {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Configs by kind. A missing kind means the feature is off.
    pub configs: BTreeMap<String, NetworkConfig>,
}

impl Network {
    /// Create a network without configs.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Store `config` under its kind, replacing any previous value of that kind.
    pub fn with_config(mut self, config: NetworkConfig) -> Self {
        self.configs.insert(config.kind().to_string(), config);
        self
    }

    pub fn state_config(&self) -> Option<&StateConfig> {
        match self.configs.get(STATE_CONFIG_KIND) {
            Some(NetworkConfig::State(config)) => Some(config),
            _ => None,
        }
    }

    pub fn sentry_config(&self) -> Option<&NetworkSentryConfig> {
        match self.configs.get(SENTRY_CONFIG_KIND) {
            Some(NetworkConfig::Sentry(config)) => Some(config),
            _ => None,
        }
    }

    pub fn dns_config(&self) -> Option<&NetworkDnsConfig> {
        match self.configs.get(DNS_CONFIG_KIND) {
            Some(NetworkConfig::Dns(config)) => Some(config),
            _ => None,
        }
    }
}
