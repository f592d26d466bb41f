//! # Wire Forms and Config Codecs
//!
//! The entity storage service hands networks and entity graphs over with
//! configs still encoded as bytes. This module defines those wire forms and
//! the per-type codecs that turn them into `EntityConfig`/`NetworkConfig`.
//!
//! ## Codec Registry
//!
//! | Registered name          | Model                 |
//! |--------------------------|-----------------------|
//! | `magmad_gateway` entity  | `GatewayConfig`       |
//! | `upgrade_tier` entity    | `Tier`                |
//! | `state_config` kind      | `StateConfig`         |
//! | `sentry_config` kind     | `NetworkSentryConfig` |
//! | `dns_config` kind        | `NetworkDnsConfig`    |
//!
//! Config bodies are JSON, matching the user-facing API models. An empty body
//! means "no config" for entities and networks alike. A non-empty body for an
//! unregistered name is an error.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::dns::NetworkDnsConfig;
use crate::entities::*;
use crate::errors::CodecError;

// =============================================================================
// WIRE TYPES
// =============================================================================

/// Serialized network as supplied by the storage service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkWire {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Encoded config bodies by kind.
    pub configs: BTreeMap<String, Vec<u8>>,
}

/// Serialized network entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityWire {
    pub network_id: String,
    pub entity_type: String,
    pub key: String,
    pub name: String,
    pub physical_id: String,
    /// Encoded config body; empty when the entity has no config.
    pub config: Vec<u8>,
}

/// Directed parent -> child association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeWire {
    pub from: EntityId,
    pub to: EntityId,
}

/// Serialized entity graph of one network.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityGraphWire {
    pub entities: Vec<EntityWire>,
    pub edges: Vec<EdgeWire>,
}

// =============================================================================
// CODECS
// =============================================================================

fn decode_json<T: DeserializeOwned>(type_name: &str, bytes: &[u8]) -> Result<T, CodecError> {
    serde_json::from_slice(bytes).map_err(|e| CodecError::Decode {
        type_name: type_name.to_string(),
        message: e.to_string(),
    })
}

fn encode_json<T: Serialize>(type_name: &str, value: &T) -> Result<Vec<u8>, CodecError> {
    serde_json::to_vec(value).map_err(|e| CodecError::Encode {
        type_name: type_name.to_string(),
        message: e.to_string(),
    })
}

impl EntityConfig {
    /// Decode the config body of an entity of `entity_type`.
    ///
    /// Returns `Ok(None)` for an empty body.
    pub fn decode(entity_type: &str, bytes: &[u8]) -> Result<Option<Self>, CodecError> {
        if bytes.is_empty() {
            return Ok(None);
        }
        let config = match entity_type {
            GATEWAY_ENTITY_TYPE => Self::Gateway(decode_json(entity_type, bytes)?),
            UPGRADE_TIER_ENTITY_TYPE => Self::UpgradeTier(decode_json(entity_type, bytes)?),
            other => return Err(CodecError::UnregisteredType(other.to_string())),
        };
        Ok(Some(config))
    }

    /// Encode to a config body.
    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        match self {
            Self::Gateway(config) => encode_json(self.entity_type(), config),
            Self::UpgradeTier(tier) => encode_json(self.entity_type(), tier),
        }
    }
}

impl NetworkConfig {
    /// Decode the body stored under `kind`.
    ///
    /// Returns `Ok(None)` for an empty body, like an absent kind. Bodies are
    /// only unmarshalled here; request validation (e.g.
    /// `NetworkDnsConfig::from_json`) belongs to the API layer.
    pub fn decode(kind: &str, bytes: &[u8]) -> Result<Option<Self>, CodecError> {
        if bytes.is_empty() {
            return Ok(None);
        }
        let config = match kind {
            STATE_CONFIG_KIND => Self::State(decode_json(kind, bytes)?),
            SENTRY_CONFIG_KIND => Self::Sentry(decode_json(kind, bytes)?),
            DNS_CONFIG_KIND => Self::Dns(decode_json::<NetworkDnsConfig>(kind, bytes)?),
            other => return Err(CodecError::UnregisteredType(other.to_string())),
        };
        Ok(Some(config))
    }

    /// Encode to a config body.
    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        match self {
            Self::State(config) => encode_json(self.kind(), config),
            Self::Sentry(config) => encode_json(self.kind(), config),
            Self::Dns(config) => encode_json(self.kind(), config),
        }
    }
}

// =============================================================================
// WIRE <-> NATIVE
// =============================================================================

impl NetworkEntity {
    /// Decode an entity, running its config through the registered codec.
    pub fn from_wire(wire: &EntityWire) -> Result<Self, CodecError> {
        Ok(Self {
            network_id: wire.network_id.clone(),
            id: EntityId::new(wire.entity_type.clone(), wire.key.clone()),
            name: wire.name.clone(),
            physical_id: (!wire.physical_id.is_empty()).then(|| wire.physical_id.clone()),
            config: EntityConfig::decode(&wire.entity_type, &wire.config)?,
        })
    }

    /// Encode back to the wire form.
    pub fn to_wire(&self) -> Result<EntityWire, CodecError> {
        let config = match &self.config {
            Some(config) => config.encode()?,
            None => Vec::new(),
        };
        Ok(EntityWire {
            network_id: self.network_id.clone(),
            entity_type: self.id.entity_type.clone(),
            key: self.id.key.clone(),
            name: self.name.clone(),
            physical_id: self.physical_id.clone().unwrap_or_default(),
            config,
        })
    }
}

impl Network {
    /// Decode a network and every config it carries.
    pub fn from_wire(wire: &NetworkWire) -> Result<Self, CodecError> {
        let configs = wire
            .configs
            .iter()
            .filter_map(|(kind, bytes)| {
                NetworkConfig::decode(kind, bytes)
                    .transpose()
                    .map(|config| config.map(|config| (kind.clone(), config)))
            })
            .collect::<Result<BTreeMap<_, _>, CodecError>>()?;
        Ok(Self {
            id: wire.id.clone(),
            name: wire.name.clone(),
            description: wire.description.clone(),
            configs,
        })
    }

    /// Encode back to the wire form.
    pub fn to_wire(&self) -> Result<NetworkWire, CodecError> {
        let configs = self
            .configs
            .iter()
            .map(|(kind, config)| Ok((kind.clone(), config.encode()?)))
            .collect::<Result<BTreeMap<_, _>, CodecError>>()?;
        Ok(NetworkWire {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            configs,
        })
    }
}
