//! Layered configuration loading
//!
//! Every binary merges, in increasing priority:
//! 1. serialized defaults
//! 2. a TOML file (explicit path, or the binary's default file name)
//! 3. prefixed environment variables, `__` separating nested keys
//! 4. whatever [`ConfigLoader::extend`] adds

use crate::error::ConfigurationError;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;

/// Contract for configuration types loaded through figment
pub trait ConfigLoader: Default + Serialize + DeserializeOwned {
    /// File read when no explicit path is given
    const DEFAULT_FILE: &'static str;

    /// Prefix of the environment variables that override file values
    const ENV_PREFIX: &'static str;

    /// Hook for providers merged after the standard chain
    fn extend(figment: Figment) -> Figment {
        figment
    }

    /// Build the provider chain for this configuration
    fn figment(path: Option<&Path>) -> Figment {
        let file = match path {
            Some(p) => Toml::file(p),
            None => Toml::file(Self::DEFAULT_FILE),
        };

        let figment = Figment::from(Serialized::defaults(Self::default()))
            .merge(file)
            .merge(Env::prefixed(Self::ENV_PREFIX).split("__"));

        Self::extend(figment)
    }

    /// Load from the optional file path plus environment
    fn load(path: Option<&Path>) -> Result<Self, ConfigurationError> {
        Self::figment(path)
            .extract()
            .map_err(|e| ConfigurationError::ParseError {
                details: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Write;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct Sample {
        name: String,
        port: u16,
    }

    impl Default for Sample {
        fn default() -> Self {
            Self {
                name: "sample".to_string(),
                port: 3000,
            }
        }
    }

    impl ConfigLoader for Sample {
        const DEFAULT_FILE: &'static str = "authgate-common-sample-does-not-exist.toml";
        const ENV_PREFIX: &'static str = "AUTHGATE_COMMON_SAMPLE_";
    }

    #[test]
    fn test_defaults_when_file_missing() {
        let loaded = Sample::load(None).unwrap();
        assert_eq!(loaded, Sample::default());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = 8081").unwrap();

        let loaded = Sample::load(Some(file.path())).unwrap();
        assert_eq!(loaded.port, 8081);
        assert_eq!(loaded.name, "sample");
    }

    #[test]
    fn test_parse_error_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = \"not a number\"").unwrap();

        let err = Sample::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigurationError::ParseError { .. }));
    }
}
