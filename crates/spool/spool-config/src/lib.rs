mod config;

pub use config::{ConfigError, SpoolConfig};
