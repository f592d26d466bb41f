//! # IPC Message Handler
//!
//! Bridges encoded build requests to a `BuildServiceApi`.
//!
//! RULES:
//! - Every request gets exactly one response
//! - A request that fails to decode is answered with a `Deserialization`
//!   failure rather than dropped

use tracing::{debug, warn};

use crate::error::{BuildError, BuildErrorKind};
use crate::ipc::payloads::{BuildFailure, BuildRequest, BuildResponse};
use crate::ports::BuildServiceApi;

/// Handler for build requests
pub struct BuildHandler<S: BuildServiceApi> {
    service: S,
}

impl<S: BuildServiceApi> BuildHandler<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Handle a decoded request.
    pub fn handle(&self, request: &BuildRequest) -> BuildResponse {
        debug!(
            network_id = %request.network.id,
            gateway_id = %request.gateway_id,
            entities = request.graph.entities.len(),
            "handling build request"
        );
        self.service
            .build(&request.network, &request.graph, &request.gateway_id)
            .into()
    }

    /// Handle a bincode-encoded request and return the encoded response.
    ///
    /// Only failing to encode the response is an error here; every other
    /// failure travels inside the response.
    pub fn handle_bytes(&self, bytes: &[u8]) -> Result<Vec<u8>, BuildError> {
        let response = match bincode::deserialize::<BuildRequest>(bytes) {
            Ok(request) => self.handle(&request),
            Err(e) => {
                warn!(error = %e, "rejecting undecodable build request");
                BuildResponse::Err(BuildFailure {
                    kind: BuildErrorKind::Deserialization,
                    message: BuildError::RequestDecode(e.to_string()).to_string(),
                })
            }
        };
        bincode::serialize(&response).map_err(|e| BuildError::Serialization {
            key: "response".to_string(),
            message: e.to_string(),
        })
    }
}
