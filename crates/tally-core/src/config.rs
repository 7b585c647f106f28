//! Store configuration
//!
//! Configuration is stored in `.tally/config.toml`. Every field has a
//! default so a missing or sparse file still opens cleanly.

use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::id::IdScheme;

/// Current store format version
pub const STORE_FORMAT_VERSION: u32 = 1;

/// Values `env_flag` reads as true (after trim + lowercase)
const TRUTH_VALUES: [&str; 4] = ["true", "1", "yes", "on"];

/// Store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store format version for compatibility checking
    #[serde(default = "default_version")]
    pub version: u32,

    /// ID generation scheme for new documents
    #[serde(default)]
    pub id_scheme: IdScheme,

    /// Grader name stamped into new score cards (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grader: Option<String>,

    /// Course id assumed when a command omits `--course` (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_course: Option<String>,
}

fn default_version() -> u32 {
    STORE_FORMAT_VERSION
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            version: STORE_FORMAT_VERSION,
            id_scheme: IdScheme::default(),
            grader: None,
            default_course: None,
        }
    }
}

impl StoreConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: StoreConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// Read a boolean from the environment
///
/// `true`, `1`, `yes`, and `on` (any case, surrounding whitespace
/// ignored) count as true; anything else is false. Unset or empty
/// returns the default.
pub fn env_flag(name: &str, default: bool) -> bool {
    match env::var(name) {
        Ok(value) => {
            let normalized = value.trim().to_lowercase();
            if normalized.is_empty() {
                default
            } else {
                TRUTH_VALUES.contains(&normalized.as_str())
            }
        }
        Err(_) => default,
    }
}
