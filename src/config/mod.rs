//! Application configuration.

mod read_config;
mod types;

pub use read_config::{read_config, resolve_token, ConfigError, ConfigSource, Result};
pub use types::{CatalogsConfig, Config, StoreConfig, SyncConfig};
