//! Configuration types for a search run

use crate::error::{ConfigError, Result};
use crate::verifier::Profile;
use serde::{Deserialize, Serialize};

/// Full configuration for one search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Mask describing the base search space
    pub mask: String,

    /// Which external verifier command to run
    pub profile: Profile,

    /// Resource parameter bound into the verifier command
    /// (gpg key name, LUKS device)
    pub param: String,

    /// Custom charsets `?1`..`?4`, empty when unset
    #[serde(default)]
    pub custom_charsets: [String; 4],

    /// Mask appended to the template after each unsuccessful round
    #[serde(default)]
    pub increment_mask: Option<String>,

    /// Number of escalation rounds permitted after round 0
    #[serde(default = "default_increment_count")]
    pub increment_count: u32,

    /// Size of the verification worker pool
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_increment_count() -> u32 {
    crate::DEFAULT_INCREMENT_COUNT
}

fn default_workers() -> usize {
    num_cpus::get()
}

impl SearchConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SearchConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.mask.is_empty() {
            return Err(ConfigError::EmptyMask.into());
        }

        if self.workers == 0 {
            return Err(ConfigError::NoWorkers.into());
        }

        if matches!(self.increment_mask.as_deref(), Some("")) {
            return Err(ConfigError::EmptyIncrementMask.into());
        }

        Ok(())
    }
}
