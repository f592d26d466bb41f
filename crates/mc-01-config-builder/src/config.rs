//! Builder configuration
//!
//! The version tag is explicit. Resolving a default (e.g. from the
//! environment) belongs to the service-initialization layer, not here.

/// Configuration fixed at builder construction and shared read-only by
/// every build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderConfig {
    /// Orchestrator build/version tag stamped into device agent configs.
    pub version_tag: String,
}

impl BuilderConfig {
    pub fn new(version_tag: impl Into<String>) -> Self {
        Self {
            version_tag: version_tag.into(),
        }
    }

    /// Builder-style method to replace the version tag
    pub fn with_version_tag(mut self, version_tag: impl Into<String>) -> Self {
        self.version_tag = version_tag.into();
        self
    }
}
