//! # Network DNS Configuration
//!
//! Request body model for the network DNS resource served by the API layer.
//! The builder does not consume it; it is registered as the `dns_config`
//! network config kind so networks carrying it decode cleanly.
//!
//! ## Rules
//!
//! - `enable_caching` and `local_ttl` are required (enforced by serde).
//! - Every record needs a non-empty `domain`.
//! - Entries of `a_record`, `aaaa_record` and `cname_record` must be non-empty.

use serde::{Deserialize, Serialize};

use crate::errors::{CodecError, FieldViolation, ValidationError};

const MIN_LENGTH_REASON: &str = "should be at least 1 chars long";

/// DNS configuration for a network.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkDnsConfig {
    pub enable_caching: bool,
    pub local_ttl: i32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub records: Vec<DnsRecord>,
}

/// Mapping used for DNS resolving from a domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    pub domain: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub a_record: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aaaa_record: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cname_record: Vec<String>,
}

impl NetworkDnsConfig {
    /// Validate every record, collecting all violations.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let violations = self
            .records
            .iter()
            .enumerate()
            .flat_map(|(i, record)| {
                let parent = format!("records.{}", i);
                record
                    .violations()
                    .into_iter()
                    .map(move |v| v.nested_under(&parent))
            })
            .collect();
        ValidationError::from_violations(violations)
    }

    /// Parse a JSON request body and validate it.
    pub fn from_json(body: &[u8]) -> Result<Self, CodecError> {
        let config: Self = serde_json::from_slice(body).map_err(|e| CodecError::Decode {
            type_name: "network DNS config".to_string(),
            message: e.to_string(),
        })?;
        config.validate().map_err(|source| CodecError::Invalid {
            type_name: "network DNS config".to_string(),
            source,
        })?;
        Ok(config)
    }
}

impl DnsRecord {
    /// Validate this record on its own.
    pub fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::from_violations(self.violations())
    }

    fn violations(&self) -> Vec<FieldViolation> {
        let mut out = Vec::new();
        for (field, entries) in [
            ("a_record", &self.a_record),
            ("aaaa_record", &self.aaaa_record),
            ("cname_record", &self.cname_record),
        ] {
            for (i, entry) in entries.iter().enumerate() {
                if entry.is_empty() {
                    out.push(FieldViolation::new(format!("{}.{}", field, i), MIN_LENGTH_REASON));
                }
            }
        }
        if self.domain.is_empty() {
            out.push(FieldViolation::new("domain", MIN_LENGTH_REASON));
        }
        out
    }
}
