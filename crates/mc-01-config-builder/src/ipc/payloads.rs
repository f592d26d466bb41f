//! # IPC Payloads
//!
//! Request and response payloads for the build endpoint. Both are encoded
//! with bincode; config bodies inside the wire forms stay opaque bytes.

use serde::{Deserialize, Serialize};
use shared_types::{EntityGraphWire, NetworkWire};

use crate::domain::ConfigsByKey;
use crate::error::{BuildError, BuildErrorKind};

// ============================================================
// INCOMING REQUESTS
// ============================================================

/// Build every config for one gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildRequest {
    /// The gateway's network, with its raw configs.
    pub network: NetworkWire,
    /// The network's entity graph.
    pub graph: EntityGraphWire,
    /// Key of the gateway entity.
    pub gateway_id: String,
}

// ============================================================
// OUTGOING RESPONSES
// ============================================================

/// Outcome of a build. A failure never carries partial configs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildResponse {
    Ok { configs_by_key: ConfigsByKey },
    Err(BuildFailure),
}

impl BuildResponse {
    pub fn is_ok(&self) -> bool {
        matches!(self, BuildResponse::Ok { .. })
    }
}

impl From<Result<ConfigsByKey, BuildError>> for BuildResponse {
    fn from(result: Result<ConfigsByKey, BuildError>) -> Self {
        match result {
            Ok(configs_by_key) => BuildResponse::Ok { configs_by_key },
            Err(e) => BuildResponse::Err(BuildFailure::from(&e)),
        }
    }
}

/// Structured failure sent back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildFailure {
    pub kind: BuildErrorKind,
    pub message: String,
}

impl From<&BuildError> for BuildFailure {
    fn from(e: &BuildError) -> Self {
        Self {
            kind: e.kind(),
            message: e.to_string(),
        }
    }
}
