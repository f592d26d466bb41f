//! # Runtime Library
//!
//! Wiring for the `mc-runtime` binary, exposed for testing.
//!
//! ## Startup Sequence
//!
//! 1. Initialize logging from the environment
//! 2. Resolve the version tag once (flag, then `VERSION_TAG`)
//! 3. Build the service and handler
//! 4. Read one encoded request, write one encoded response

use std::env;
use std::io::{Read, Write};

use mc_01_config_builder::{BuildHandler, BuildService, BuildServiceApi, BuilderConfig};
use thiserror::Error;
use tracing::{debug, error};

/// Environment variable holding the orchestrator version stamped into
/// device agent configs.
pub const VERSION_TAG_ENV: &str = "VERSION_TAG";

/// Runtime errors. Build failures are not errors here; they travel inside
/// the encoded response.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("failed to read request: {0}")]
    Read(#[source] std::io::Error),

    #[error("failed to write response: {0}")]
    Write(#[source] std::io::Error),

    #[error(transparent)]
    Encode(#[from] mc_01_config_builder::BuildError),
}

/// Process-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub version_tag: String,
}

impl RuntimeConfig {
    /// Resolve configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `VERSION_TAG`: Orchestrator version. When unset an error is logged
    ///   and the tag is left empty.
    pub fn from_env() -> Self {
        Self::resolve(None, |name| env::var(name).ok())
    }

    /// Resolve with an explicit tag taking precedence. The environment is
    /// only consulted, and its absence only logged, when `flag` is `None`.
    pub fn resolve<F>(flag: Option<String>, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let version_tag = match flag.or_else(|| lookup(VERSION_TAG_ENV)) {
            Some(tag) => tag,
            None => {
                error!(
                    "{} not set, device agent configs will carry an empty version",
                    VERSION_TAG_ENV
                );
                String::new()
            }
        };
        Self { version_tag }
    }

    /// Same as [`resolve`](Self::resolve) against the process environment.
    pub fn resolve_from_env(flag: Option<String>) -> Self {
        Self::resolve(flag, |name| env::var(name).ok())
    }

    pub fn builder_config(&self) -> BuilderConfig {
        BuilderConfig::new(self.version_tag.clone())
    }
}

/// Build the default handler for `config`.
pub fn build_handler(config: &RuntimeConfig) -> BuildHandler<BuildService> {
    BuildHandler::new(BuildService::new(config.builder_config()))
}

/// Read one request from `reader` until EOF and write its response.
pub fn serve_once<S, R, W>(
    handler: &BuildHandler<S>,
    mut reader: R,
    mut writer: W,
) -> Result<usize, RuntimeError>
where
    S: BuildServiceApi,
    R: Read,
    W: Write,
{
    let mut request = Vec::new();
    reader.read_to_end(&mut request).map_err(RuntimeError::Read)?;
    debug!(bytes = request.len(), "request read");

    let response = handler.handle_bytes(&request)?;
    writer.write_all(&response).map_err(RuntimeError::Write)?;
    writer.flush().map_err(RuntimeError::Write)?;
    Ok(response.len())
}
