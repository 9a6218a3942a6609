//! Configuration file reading and parsing.
//!
//! Locates, reads, and parses the INI-format configuration file, with
//! support for individual key=value overrides and environment fallbacks.

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

use configparser::ini::Ini;
use thiserror::Error;

use crate::store::AccessToken;

use super::{CatalogsConfig, Config, StoreConfig, SyncConfig};

// =============================================================================
// Constants - Default Values
// =============================================================================

const DEFAULT_CATALOGS_DIR: &str = ".draftsync/catalogs";
const DEFAULT_CONTEXTS: &str = "characters,presets";
const DEFAULT_MAX_CONCURRENT_DOWNLOADS: usize = 8;
const DEFAULT_STRICT_MARKER: bool = false;

const ENV_CONFIG_FILE: &str = "DRAFTSYNC_CONFIG_FILE";
const ENV_TOKEN: &str = "DRAFTSYNC_TOKEN";
const DEFAULT_CONFIG_FILENAME: &str = ".draftsyncrc";

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid integer '{value}' for key '{key}'")]
    InvalidInteger { key: String, value: String },

    #[error("invalid boolean '{value}' for key '{key}'")]
    InvalidBoolean { key: String, value: String },

    #[error("invalid override key '{key}': expected section.key")]
    InvalidOverrideKey { key: String },

    #[error("failed to read token file {path}: {source}")]
    TokenFile {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for config operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

// =============================================================================
// ConfigSource
// =============================================================================

/// Specifies how to locate and layer configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigSource {
    /// Explicit config file path from CLI. If specified and missing, error.
    /// If None, fall back to DRAFTSYNC_CONFIG_FILE, then ~/.draftsyncrc,
    /// then built-in defaults.
    pub config_file: Option<PathBuf>,

    /// Individual key=value overrides (applied last).
    /// Keys use dot-notation: "store.base_url", "sync.strict_marker".
    pub overrides: Vec<(String, String)>,
}

// =============================================================================
// Reading
// =============================================================================

type Sections = HashMap<String, HashMap<String, Option<String>>>;

/// Read configuration from the given source.
pub fn read_config(source: &ConfigSource) -> Result<Config> {
    let mut sections = match locate_config_file(source)? {
        Some(path) => load_ini(&path)?,
        None => Sections::new(),
    };

    apply_overrides(&mut sections, &source.overrides)?;
    build_config(&sections)
}

fn locate_config_file(source: &ConfigSource) -> Result<Option<PathBuf>> {
    if let Some(path) = &source.config_file {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.clone()));
        }
        return Ok(Some(path.clone()));
    }

    if let Ok(path) = env::var(ENV_CONFIG_FILE) {
        let path = PathBuf::from(path);
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path));
        }
        return Ok(Some(path));
    }

    if let Some(home) = dirs::home_dir() {
        let path = home.join(DEFAULT_CONFIG_FILENAME);
        if path.exists() {
            return Ok(Some(path));
        }
    }

    Ok(None)
}

fn load_ini(path: &Path) -> Result<Sections> {
    let mut ini = Ini::new();
    ini.load(path).map_err(|message| ConfigError::ParseError {
        path: path.to_path_buf(),
        message,
    })?;
    Ok(ini.get_map().unwrap_or_default())
}

fn apply_overrides(sections: &mut Sections, overrides: &[(String, String)]) -> Result<()> {
    for (key, value) in overrides {
        let (section, name) = key
            .split_once('.')
            .ok_or_else(|| ConfigError::InvalidOverrideKey { key: key.clone() })?;
        sections
            .entry(section.to_string())
            .or_default()
            .insert(name.to_string(), Some(value.clone()));
    }
    Ok(())
}

fn get<'a>(sections: &'a Sections, section: &str, key: &str) -> Option<&'a str> {
    sections
        .get(section)
        .and_then(|s| s.get(key))
        .and_then(|v| v.as_deref())
}

fn get_usize(sections: &Sections, section: &str, key: &str, default: usize) -> Result<usize> {
    match get(sections, section, key) {
        Some(value) => value.trim().parse().map_err(|_| ConfigError::InvalidInteger {
            key: format!("{}.{}", section, key),
            value: value.to_string(),
        }),
        None => Ok(default),
    }
}

fn get_bool(sections: &Sections, section: &str, key: &str, default: bool) -> Result<bool> {
    match get(sections, section, key) {
        Some(value) => match value.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(true),
            "false" | "no" | "0" => Ok(false),
            _ => Err(ConfigError::InvalidBoolean {
                key: format!("{}.{}", section, key),
                value: value.to_string(),
            }),
        },
        None => Ok(default),
    }
}

fn build_config(sections: &Sections) -> Result<Config> {
    let store = StoreConfig {
        base_url: get(sections, "store", "base_url")
            .unwrap_or_default()
            .trim_end_matches('/')
            .to_string(),
        token: get(sections, "store", "token").map(str::to_string),
        token_file: get(sections, "store", "token_file").map(PathBuf::from),
    };

    let catalogs = CatalogsConfig {
        dir: PathBuf::from(get(sections, "catalogs", "dir").unwrap_or(DEFAULT_CATALOGS_DIR)),
        contexts: get(sections, "catalogs", "contexts")
            .unwrap_or(DEFAULT_CONTEXTS)
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
    };

    let sync = SyncConfig {
        max_concurrent_downloads: get_usize(
            sections,
            "sync",
            "max_concurrent_downloads",
            DEFAULT_MAX_CONCURRENT_DOWNLOADS,
        )?,
        strict_marker: get_bool(sections, "sync", "strict_marker", DEFAULT_STRICT_MARKER)?,
    };

    Ok(Config {
        store,
        catalogs,
        sync,
    })
}

// =============================================================================
// Token Resolution
// =============================================================================

/// Resolve the access token for the remote store.
///
/// Precedence: inline config value, then token file, then the
/// DRAFTSYNC_TOKEN environment variable. Returns `None` when no token is
/// configured anywhere; the sync engine turns that into its credential
/// error before any remote call.
pub fn resolve_token(store: &StoreConfig) -> Result<Option<AccessToken>> {
    if let Some(token) = &store.token {
        return Ok(Some(AccessToken::new(token.trim())));
    }

    if let Some(path) = &store.token_file {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::TokenFile {
            path: path.clone(),
            source,
        })?;
        return Ok(Some(AccessToken::new(contents.trim())));
    }

    if let Ok(token) = env::var(ENV_TOKEN) {
        if !token.trim().is_empty() {
            return Ok(Some(AccessToken::new(token.trim())));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("draftsync.ini");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn test_read_full_config() {
        let (_dir, path) = write_config(
            r#"
[store]
base_url = https://store.example.com/api/
token = secret-token

[catalogs]
dir = /var/lib/draftsync
contexts = characters, presets, scenes

[sync]
max_concurrent_downloads = 4
strict_marker = true
"#,
        );

        let config = read_config(&ConfigSource {
            config_file: Some(path),
            overrides: vec![],
        })
        .unwrap();

        assert_eq!(config.store.base_url, "https://store.example.com/api");
        assert_eq!(config.store.token.as_deref(), Some("secret-token"));
        assert_eq!(
            config.catalogs.contexts,
            vec!["characters", "presets", "scenes"]
        );
        assert_eq!(config.sync.max_concurrent_downloads, 4);
        assert!(config.sync.strict_marker);
    }

    #[test]
    fn test_overrides_win_over_file() {
        let (_dir, path) = write_config("[store]\nbase_url = https://a.example.com\n");

        let config = read_config(&ConfigSource {
            config_file: Some(path),
            overrides: vec![(
                "store.base_url".to_string(),
                "https://b.example.com".to_string(),
            )],
        })
        .unwrap();

        assert_eq!(config.store.base_url, "https://b.example.com");
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let result = read_config(&ConfigSource {
            config_file: Some(PathBuf::from("/no/such/file.ini")),
            overrides: vec![],
        });
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_invalid_boolean_is_reported() {
        let (_dir, path) = write_config("[sync]\nstrict_marker = maybe\n");

        let result = read_config(&ConfigSource {
            config_file: Some(path),
            overrides: vec![],
        });
        assert!(matches!(result, Err(ConfigError::InvalidBoolean { .. })));
    }

    #[test]
    fn test_invalid_override_key_is_reported() {
        let (_dir, path) = write_config("[store]\nbase_url = https://a.example.com\n");

        let result = read_config(&ConfigSource {
            config_file: Some(path),
            overrides: vec![("nodot".to_string(), "x".to_string())],
        });
        assert!(matches!(result, Err(ConfigError::InvalidOverrideKey { .. })));
    }

    #[test]
    fn test_token_file_resolution() {
        let dir = tempfile::tempdir().unwrap();
        let token_path = dir.path().join("token");
        std::fs::write(&token_path, "  file-token\n").unwrap();

        let store = StoreConfig {
            base_url: String::new(),
            token: None,
            token_file: Some(token_path),
        };

        let token = resolve_token(&store).unwrap().unwrap();
        assert_eq!(token.secret(), "file-token");
    }

    #[test]
    fn test_inline_token_wins_over_file() {
        let store = StoreConfig {
            base_url: String::new(),
            token: Some("inline".to_string()),
            token_file: Some(PathBuf::from("/no/such/token")),
        };

        let token = resolve_token(&store).unwrap().unwrap();
        assert_eq!(token.secret(), "inline");
    }
}
