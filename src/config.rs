// Deployment configuration for the registry contracts
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;
use crate::primitives::{ConfigError, Policy, Principal};

/// Contract deployment parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Fixed admin principal; cannot change after deployment
    pub admin: Principal,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            admin: Principal::from(Policy::DEFAULT_ADMIN),
        }
    }
}

impl RegistryConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: RegistryConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!("Loading registry config from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Replace the admin, e.g. from a command-line override
    pub fn with_admin(mut self, admin: Principal) -> Result<Self, ConfigError> {
        self.admin = admin;
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.admin.as_str().trim().is_empty() {
            return Err(ConfigError::Invalid("admin principal must not be empty".to_string()));
        }
        Ok(())
    }
}
