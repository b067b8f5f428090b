//! Configuration management
//!
//! A [`LambdaConfig`] is built once at startup and then shared read-only by every
//! adapter. Callers that need different values merge a [`ConfigOverrides`] into the
//! defaults before handing the snapshot out.

use crate::error::Result;
use serde::Deserialize;
use std::fmt;

/// Prefix for environment variables read by [`LambdaConfig::load`]
pub const ENV_PREFIX: &str = "LAMBDA_BRIDGE";

/// Default configuration file name (any format supported by `config`)
pub const DEFAULT_FILE: &str = "lambda-bridge";

/// Credentials, region and retry policy for the Lambda client
#[derive(Clone, Deserialize, PartialEq, Eq)]
pub struct LambdaConfig {
    /// AWS access key id. When empty the client only has credentials if its factory
    /// was built on a shared AWS config (`AwsClientFactory::from_env`).
    #[serde(default, alias = "KEY")]
    pub key: String,

    #[serde(default, alias = "SECRET")]
    pub secret: String,

    #[serde(default = "default_region", alias = "REGION")]
    pub region: String,

    /// Maximum attempts the SDK client makes per request
    #[serde(default = "default_max_retries", alias = "MAX_RETRIES")]
    pub max_retries: u32,

    /// Endpoint override, e.g. a local emulator
    #[serde(default, alias = "ENDPOINT_URL")]
    pub endpoint_url: Option<String>,
}

impl Default for LambdaConfig {
    fn default() -> Self {
        Self {
            key: String::new(),
            secret: String::new(),
            region: default_region(),
            max_retries: default_max_retries(),
            endpoint_url: None,
        }
    }
}

impl fmt::Debug for LambdaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LambdaConfig")
            .field("key", &self.key)
            .field("secret", &if self.secret.is_empty() { "" } else { "<redacted>" })
            .field("region", &self.region)
            .field("max_retries", &self.max_retries)
            .field("endpoint_url", &self.endpoint_url)
            .finish()
    }
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_max_retries() -> u32 {
    3
}

/// Partial configuration; every present field replaces the base value
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ConfigOverrides {
    #[serde(default, alias = "KEY")]
    pub key: Option<String>,
    #[serde(default, alias = "SECRET")]
    pub secret: Option<String>,
    #[serde(default, alias = "REGION")]
    pub region: Option<String>,
    #[serde(default, alias = "MAX_RETRIES")]
    pub max_retries: Option<u32>,
    #[serde(default, alias = "ENDPOINT_URL")]
    pub endpoint_url: Option<String>,
}

impl LambdaConfig {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_FILE)
    }

    /// Load configuration from the named file (optional) and `LAMBDA_BRIDGE_*` variables
    pub fn load_from(file: &str) -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(file).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()?;

        Ok(config.try_deserialize::<LambdaConfig>()?)
    }

    /// Parse a TOML document, filling unspecified keys with defaults
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?;

        Ok(config.try_deserialize::<LambdaConfig>()?)
    }

    /// Shallow merge: each override that is set replaces the current value
    #[must_use]
    pub fn merge(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(key) = overrides.key {
            self.key = key;
        }
        if let Some(secret) = overrides.secret {
            self.secret = secret;
        }
        if let Some(region) = overrides.region {
            self.region = region;
        }
        if let Some(max_retries) = overrides.max_retries {
            self.max_retries = max_retries;
        }
        if overrides.endpoint_url.is_some() {
            self.endpoint_url = overrides.endpoint_url;
        }
        self
    }

    /// Static key pair, when both halves are configured
    pub fn static_credentials(&self) -> Option<(&str, &str)> {
        if self.key.is_empty() || self.secret.is_empty() {
            return None;
        }
        Some((&self.key, &self.secret))
    }
}
