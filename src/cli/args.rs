//! Command-line argument definitions and helpers.

use std::path::PathBuf;

use clap::Args;
use thiserror::Error;
use tokio::io::AsyncWriteExt;

use crate::app::AppContext;
use crate::config::ConfigSource;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur during argument processing.
#[derive(Debug, Error)]
pub enum ArgsError {
    /// I/O error reading or writing.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for argument operations.
pub type Result<T> = std::result::Result<T, ArgsError>;

// =============================================================================
// Global Arguments
// =============================================================================

/// Global arguments that apply to all commands.
#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    /// Path to the configuration file.
    #[arg(long = "config-file", global = true)]
    pub config_file: Option<PathBuf>,

    /// Configuration overrides in the form section.key=value.
    #[arg(long = "config", value_parser = parse_config_override, global = true)]
    pub config_overrides: Vec<(String, String)>,

    /// Format output as JSON.
    #[arg(long, global = true)]
    pub json: bool,
}

impl GlobalArgs {
    /// Convert to a ConfigSource for reading configuration.
    pub fn to_config_source(&self) -> ConfigSource {
        ConfigSource {
            config_file: self.config_file.clone(),
            overrides: self.config_overrides.clone(),
        }
    }

    /// Convert to an AppContext for creating an App.
    pub fn to_app_context(&self) -> AppContext {
        AppContext {
            config_source: self.to_config_source(),
        }
    }
}

/// Parse a config override from "section.key=value" format.
fn parse_config_override(s: &str) -> std::result::Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid config override '{}': expected name=value", s))?;
    Ok((name.to_string(), value.to_string()))
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Helper for commands that write output to a file or stdout.
#[derive(Args, Debug, Default)]
pub struct OutputSink {
    /// Write output to this file instead of stdout.
    #[arg(id = "output_file", short = 'o', long = "output-file")]
    pub file: Option<PathBuf>,
}

impl OutputSink {
    /// Write a string value to the output.
    pub async fn write_str(&self, value: &str) -> Result<()> {
        match &self.file {
            Some(path) => {
                tokio::fs::write(path, value).await?;
            }
            None => {
                tokio::io::stdout().write_all(value.as_bytes()).await?;
                tokio::io::stdout().write_all(b"\n").await?;
            }
        }
        Ok(())
    }

    /// Write a value to the output as pretty-printed JSON.
    pub async fn write_json<T: serde::Serialize>(&self, value: &T) -> Result<()> {
        let output = serde_json::to_string_pretty(value)?;
        self.write_str(&output).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_override() {
        assert_eq!(
            parse_config_override("store.base_url=https://x").unwrap(),
            ("store.base_url".to_string(), "https://x".to_string())
        );
        assert!(parse_config_override("no-equals").is_err());
    }

    #[tokio::test]
    async fn test_output_sink_writes_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");

        let sink = OutputSink {
            file: Some(path.clone()),
        };
        sink.write_str("hello").await.unwrap();

        assert_eq!(std::fs::read_to_string(path).unwrap(), "hello");
    }
}
