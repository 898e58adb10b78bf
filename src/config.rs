//! Configuration for the monitor and the reference machine.
//!
//! Everything has a default, so a config file is optional. The file is TOML:
//!
//! ```toml
//! [monitor]
//! prompt = "(sdb) "
//! batch = false
//! history_size = 1000
//!
//! [memory]
//! base = 0x80000000
//! size = 0x08000000
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default guest memory base address.
pub const DEFAULT_MEM_BASE: u32 = 0x8000_0000;
/// Default guest memory size (128 MiB).
pub const DEFAULT_MEM_SIZE: u32 = 0x0800_0000;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Monitor session settings.
    pub monitor: MonitorConfig,
    /// Guest physical memory layout.
    pub memory: MemoryConfig,
}

/// Monitor session settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Skip the prompt and run the program to completion.
    pub batch: bool,
    /// Prompt shown before each command.
    pub prompt: String,
    /// Maximum number of remembered input lines.
    pub history_size: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            batch: false,
            prompt: "(sdb) ".into(),
            history_size: 1000,
        }
    }
}

/// Guest physical memory layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// First physical address backed by RAM.
    pub base: u32,
    /// RAM size in bytes.
    pub size: u32,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            base: DEFAULT_MEM_BASE,
            size: DEFAULT_MEM_SIZE,
        }
    }
}

impl Config {
    /// Load a config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::parse(&text)
    }

    /// Parse config text.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let MemoryConfig { base, size } = self.memory;
        if size == 0 {
            return Err(ConfigError::Invalid("memory size must be non-zero".into()));
        }
        if base.checked_add(size - 1).is_none() {
            return Err(ConfigError::Invalid(format!(
                "memory [{:#x}, +{:#x}) does not fit in 32 bits",
                base, size
            )));
        }
        Ok(())
    }
}

/// Errors from loading configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {message}")]
    Io { path: String, message: String },

    #[error("invalid config file: {0}")]
    Parse(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}
