use serde::Deserialize;
use std::path::Path;

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SpoolConfig {
    #[serde(default = "defaults::ring_path")]
    pub ring_path: String,
    #[serde(default = "defaults::log_level")]
    pub log_level: String,
    /// Capacity used when the ring file does not exist yet.
    #[serde(default = "defaults::capacity")]
    pub capacity: usize,
    /// Staging ring capacity, and the size of each stdin/stdout chunk.
    #[serde(default = "defaults::chunk_size")]
    pub chunk_size: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read '{path}'")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

mod defaults {
    pub fn ring_path() -> String {
        "/tmp/spool_ring".into()
    }

    pub fn log_level() -> String {
        "info".into()
    }

    pub fn capacity() -> usize {
        1 << 16 // 65536
    }

    pub fn chunk_size() -> usize {
        4096
    }
}

impl Default for SpoolConfig {
    fn default() -> Self {
        Self {
            ring_path: defaults::ring_path(),
            log_level: defaults::log_level(),
            capacity: defaults::capacity(),
            chunk_size: defaults::chunk_size(),
        }
    }
}

impl SpoolConfig {
    pub fn load(path: impl AsRef<Path> + ToString) -> Result<Self, ConfigError> {
        let toml_to_str = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::from_toml_str(&toml_to_str)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: SpoolConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// A zero-capacity ring is allowed; a zero-sized chunk would never move data.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::Invalid("chunk_size must be greater than 0"));
        }
        Ok(())
    }
}
