//! Collision-checked output map

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::domain::mconfigs::Mconfig;
use crate::error::BuildError;

/// Serialized subsystem configs by key.
///
/// A key can be written once. A second write is a `DuplicateKey` error and
/// leaves the existing value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigsByKey(BTreeMap<String, Vec<u8>>);

impl ConfigsByKey {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize every config and collect them, rejecting repeated keys.
    pub fn marshal(configs: impl IntoIterator<Item = Mconfig>) -> Result<Self, BuildError> {
        let mut out = Self::new();
        for config in configs {
            let key = config.key();
            let bytes = config.encode().map_err(|e| BuildError::Serialization {
                key: key.to_string(),
                message: e.to_string(),
            })?;
            out.insert_unique(key, bytes)?;
        }
        Ok(out)
    }

    pub fn insert_unique(&mut self, key: impl Into<String>, value: Vec<u8>) -> Result<(), BuildError> {
        let key = key.into();
        if self.0.contains_key(&key) {
            return Err(BuildError::DuplicateKey(key));
        }
        self.0.insert(key, value);
        Ok(())
    }

    /// Move every entry of `other` into `self`, rejecting shared keys.
    pub fn merge(&mut self, other: ConfigsByKey) -> Result<(), BuildError> {
        for (key, value) in other.0 {
            self.insert_unique(key, value)?;
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.0.get(key).map(Vec::as_slice)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decode the config stored under `key`.
    pub fn decode<T: DeserializeOwned>(&self, key: &str) -> Option<bincode::Result<T>> {
        self.get(key).map(|bytes| bincode::deserialize(bytes))
    }

    pub fn into_inner(self) -> BTreeMap<String, Vec<u8>> {
        self.0
    }
}

impl From<ConfigsByKey> for BTreeMap<String, Vec<u8>> {
    fn from(configs: ConfigsByKey) -> Self {
        configs.0
    }
}
