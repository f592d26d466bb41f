//! Error types for the mconfig builder

use serde::{Deserialize, Serialize};
use shared_types::{CodecError, EntityId};
use thiserror::Error;

/// Errors raised by the entity graph view
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("entity {0} not found in graph")]
    EntityNotFound(EntityId),

    #[error("no {ancestor_type} ancestor found for {start}")]
    AncestorNotFound { start: EntityId, ancestor_type: String },

    #[error("entity {0} is not part of the graph")]
    UnknownStart(EntityId),

    #[error("edge {from} -> {to} references an entity outside the graph")]
    DanglingEdge { from: EntityId, to: EntityId },

    #[error("duplicate entity {0} in graph")]
    DuplicateEntity(EntityId),

    #[error("cycle detected: {unresolved} entities are their own ancestors")]
    CycleDetected { unresolved: usize },

    #[error("failed to decode entity {entity}: {source}")]
    Codec {
        entity: EntityId,
        #[source]
        source: CodecError,
    },
}

impl GraphError {
    /// Whether this is a lookup miss rather than a broken graph.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            GraphError::EntityNotFound(_) | GraphError::AncestorNotFound { .. }
        )
    }
}

/// Coarse classification carried in structured build failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildErrorKind {
    NotFound,
    Traversal,
    Deserialization,
    Serialization,
    DuplicateKey,
}

/// Errors that abort a build. No partial output is ever returned.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("could not decode network {network_id}: {source}")]
    NetworkDecode {
        network_id: String,
        #[source]
        source: CodecError,
    },

    #[error("could not decode entity graph for network {network_id}: {source}")]
    GraphDecode {
        network_id: String,
        #[source]
        source: GraphError,
    },

    #[error("could not decode build request: {0}")]
    RequestDecode(String),

    #[error("could not find gateway {gateway_id} in graph for network {network_id}")]
    GatewayNotFound {
        network_id: String,
        gateway_id: String,
    },

    #[error("failed to load upgrade tier for gateway {gateway_id}: {source}")]
    UpgradeTier {
        gateway_id: String,
        #[source]
        source: GraphError,
    },

    #[error("failed to serialize {key} config: {message}")]
    Serialization { key: String, message: String },

    #[error("builder received duplicate config for key: {0}")]
    DuplicateKey(String),
}

impl BuildError {
    pub fn kind(&self) -> BuildErrorKind {
        match self {
            BuildError::NetworkDecode { .. }
            | BuildError::GraphDecode { .. }
            | BuildError::RequestDecode(_) => BuildErrorKind::Deserialization,
            BuildError::GatewayNotFound { .. } => BuildErrorKind::NotFound,
            BuildError::UpgradeTier { .. } => BuildErrorKind::Traversal,
            BuildError::Serialization { .. } => BuildErrorKind::Serialization,
            BuildError::DuplicateKey(_) => BuildErrorKind::DuplicateKey,
        }
    }
}
