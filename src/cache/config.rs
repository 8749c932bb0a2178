//! Cache namespace configuration.

use crate::key::Version;

/// Namespace settings fixed when a [`Cache`](super::Cache) is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheConfig {
    /// First segment of every physical key
    pub key_prefix: String,
    /// Version used when an operation does not name one
    pub version: Version,
}

impl CacheConfig {
    pub fn new(key_prefix: impl Into<String>, version: impl Into<Version>) -> Self {
        Self {
            key_prefix: key_prefix.into(),
            version: version.into(),
        }
    }

    /// Set the key prefix.
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Set the default version.
    pub fn with_version(mut self, version: impl Into<Version>) -> Self {
        self.version = version.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.key_prefix, "");
        assert_eq!(config.version, Version::Number(1));
    }

    #[test]
    fn test_config_builder() {
        let config = CacheConfig::default()
            .with_key_prefix("app")
            .with_version("v2.3.4");

        assert_eq!(config, CacheConfig::new("app", Version::from("v2.3.4")));
    }
}
