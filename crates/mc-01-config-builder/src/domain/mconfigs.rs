//! Subsystem config outputs (mconfigs)
//!
//! One fixed-schema value per managed gateway subsystem. Each is serialized
//! on its own with bincode and shipped under its subsystem key. Maps are
//! `BTreeMap` so the encoding is byte-deterministic.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Output keys, one per managed subsystem
pub mod keys {
    pub const DEVICE_AGENT: &str = "device_agent";
    pub const LOG_SHIPPING: &str = "log_shipping";
    pub const EVENT_LOGGING: &str = "event_logging";
    pub const VPN: &str = "vpn";
    pub const CONTROL_PROXY: &str = "control_proxy";
    pub const METRICS: &str = "metrics";
    pub const STATE: &str = "state";
    pub const SHARED_RUNTIME: &str = "shared_runtime";

    /// Keys emitted only when the gateway carries a config bundle.
    pub const GATEWAY_DEPENDENT: [&str; 4] = [DEVICE_AGENT, LOG_SHIPPING, EVENT_LOGGING, VPN];

    /// Keys emitted for every gateway.
    pub const ALWAYS: [&str; 4] = [CONTROL_PROXY, METRICS, STATE, SHARED_RUNTIME];
}

/// Log level understood by gateway services
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
    Fatal,
}

/// Device agent config
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceAgentConfig {
    pub log_level: LogLevel,
    pub checkin_interval: i32,
    pub checkin_timeout: i32,
    pub autoupgrade_enabled: bool,
    pub autoupgrade_poll_interval: i32,
    pub package_version: String,
    pub images: Vec<ImageSpec>,
    pub dynamic_services: Vec<String>,
    pub feature_flags: BTreeMap<String, bool>,
    /// Version tag of the orchestrator that built this config.
    pub orc8r_version: String,
}

/// An image the device agent should run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSpec {
    pub name: String,
    pub order: i64,
}

/// Log shipping config
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogShippingConfig {
    /// Tags attached to every shipped record.
    pub extra_tags: BTreeMap<String, String>,
    pub throttle_rate: u32,
    pub throttle_window: u32,
    pub throttle_interval: String,
    pub files_by_tag: BTreeMap<String, String>,
}

/// Event logging config
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLoggingConfig {
    pub log_level: LogLevel,
    /// -1 logs every event.
    pub event_verbosity: i32,
}

/// VPN config
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VpnConfig {
    pub enable_shell_access: bool,
}

/// Control proxy config
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlProxyConfig {
    pub log_level: LogLevel,
}

/// Metrics config
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsConfig {
    pub log_level: LogLevel,
}

/// State sync config
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSyncConfig {
    pub log_level: LogLevel,
    /// Jittered sync interval in seconds.
    pub sync_interval: u32,
}

/// Config shared by every gateway service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SharedRuntimeConfig {
    /// `None` disables crash/error telemetry on the device.
    pub error_telemetry: Option<ErrorTelemetryConfig>,
}

/// Crash/error telemetry settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorTelemetryConfig {
    pub sample_rate: f32,
    pub upload_mme_log: bool,
    pub dsn_native: String,
    pub dsn_python: String,
    pub exclusion_patterns: Vec<String>,
}

/// A computed subsystem config, tagged with the subsystem it targets
#[derive(Debug, Clone, PartialEq)]
pub enum Mconfig {
    DeviceAgent(DeviceAgentConfig),
    LogShipping(LogShippingConfig),
    EventLogging(EventLoggingConfig),
    Vpn(VpnConfig),
    ControlProxy(ControlProxyConfig),
    Metrics(MetricsConfig),
    StateSync(StateSyncConfig),
    SharedRuntime(SharedRuntimeConfig),
}

impl Mconfig {
    /// Key this config ships under.
    pub fn key(&self) -> &'static str {
        match self {
            Mconfig::DeviceAgent(_) => keys::DEVICE_AGENT,
            Mconfig::LogShipping(_) => keys::LOG_SHIPPING,
            Mconfig::EventLogging(_) => keys::EVENT_LOGGING,
            Mconfig::Vpn(_) => keys::VPN,
            Mconfig::ControlProxy(_) => keys::CONTROL_PROXY,
            Mconfig::Metrics(_) => keys::METRICS,
            Mconfig::StateSync(_) => keys::STATE,
            Mconfig::SharedRuntime(_) => keys::SHARED_RUNTIME,
        }
    }

    /// Serialize the inner config on its own (the tag is not encoded).
    pub fn encode(&self) -> bincode::Result<Vec<u8>> {
        match self {
            Mconfig::DeviceAgent(c) => bincode::serialize(c),
            Mconfig::LogShipping(c) => bincode::serialize(c),
            Mconfig::EventLogging(c) => bincode::serialize(c),
            Mconfig::Vpn(c) => bincode::serialize(c),
            Mconfig::ControlProxy(c) => bincode::serialize(c),
            Mconfig::Metrics(c) => bincode::serialize(c),
            Mconfig::StateSync(c) => bincode::serialize(c),
            Mconfig::SharedRuntime(c) => bincode::serialize(c),
        }
    }
}
