//! Configuration handling for the ipc-wire CLI.
//!
//! This module reads the `services.ipc` section of the shared config file and
//! applies environment variable overrides on top of it.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

/// Environment variable overriding the decode nesting limit
pub const ENV_MAX_DEPTH: &str = "IPC_WIRE_MAX_DEPTH";
/// Environment variable overriding the output format
pub const ENV_FORMAT: &str = "IPC_WIRE_FORMAT";

/// How encoded bytes are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lowercase hex, two digits per byte
    Hex,
    /// Eight binary digits per byte, joined by underscores
    Bin,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hex" => Ok(OutputFormat::Hex),
            "bin" | "binary" => Ok(OutputFormat::Bin),
            other => Err(anyhow::anyhow!("unknown output format {other:?}")),
        }
    }
}

impl OutputFormat {
    /// Render bytes in this format
    pub fn render(self, bytes: &[u8]) -> String {
        match self {
            OutputFormat::Hex => hex::encode(bytes),
            OutputFormat::Bin => bytes
                .iter()
                .map(|byte| format!("{byte:08b}"))
                .collect::<Vec<_>>()
                .join("_"),
        }
    }
}

/// CLI configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Maximum nesting depth accepted when decoding
    pub max_depth: usize,
    /// Output format for encoded bytes
    pub format: OutputFormat,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            max_depth: ipc_wire::DEFAULT_MAX_DEPTH,
            format: OutputFormat::Hex,
        }
    }
}

/// Root configuration structure (matches the YAML structure)
#[derive(Debug, Deserialize)]
struct RootConfig {
    services: Option<ServicesConfig>,
}

#[derive(Debug, Deserialize)]
struct ServicesConfig {
    ipc: Option<ServiceConfig>,
}

#[derive(Debug, Deserialize)]
struct ServiceConfig {
    max_depth: Option<usize>,
    format: Option<OutputFormat>,
}

impl CliConfig {
    /// Load configuration from an optional file and the environment
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => Self::from_file(path),
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok());

        info!(
            "Final ipc-wire configuration: max_depth={}, format={:?}",
            config.max_depth, config.format
        );

        Ok(config)
    }

    /// Read the file, falling back to defaults when it is missing or invalid
    fn from_file(config_path: &Path) -> Self {
        let mut config = Self::default();

        match std::fs::read_to_string(config_path) {
            Ok(content) => match serde_yaml::from_str::<RootConfig>(&content) {
                Ok(root_config) => {
                    config.apply_root_config(root_config);
                    info!("Loaded configuration from {:?}", config_path);
                }
                Err(e) => {
                    warn!("Failed to parse config file {:?}, using defaults: {}", config_path, e)
                }
            },
            Err(_) => warn!("Config file {:?} not found, using defaults", config_path),
        }

        config
    }

    fn apply_root_config(&mut self, root_config: RootConfig) {
        let Some(service) = root_config.services.and_then(|s| s.ipc) else {
            return;
        };
        if let Some(max_depth) = service.max_depth {
            self.max_depth = max_depth;
        }
        if let Some(format) = service.format {
            self.format = format;
        }
    }

    /// Apply overrides looked up by variable name
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_MAX_DEPTH) {
            match raw.parse::<usize>() {
                Ok(depth) => {
                    self.max_depth = depth;
                    info!("Max depth overridden by environment: {}", depth);
                }
                Err(_) => warn!("Ignoring invalid {}={:?}", ENV_MAX_DEPTH, raw),
            }
        }

        if let Some(raw) = lookup(ENV_FORMAT) {
            match raw.parse::<OutputFormat>() {
                Ok(format) => {
                    self.format = format;
                    info!("Output format overridden by environment: {:?}", format);
                }
                Err(_) => warn!("Ignoring invalid {}={:?}", ENV_FORMAT, raw),
            }
        }
    }

    /// Apply command-line flags, which win over file and environment
    pub fn apply_args(&mut self, max_depth: Option<usize>, format: Option<OutputFormat>) {
        if let Some(max_depth) = max_depth {
            self.max_depth = max_depth;
        }
        if let Some(format) = format {
            self.format = format;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert_eq!(config.max_depth, 128);
        assert_eq!(config.format, OutputFormat::Hex);
    }

    #[test]
    fn test_load_from_file() {
        let yaml_content = r#"
services:
  ipc:
    max_depth: 16
    format: bin
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(yaml_content.as_bytes()).unwrap();

        let config = CliConfig::from_file(temp_file.path());
        assert_eq!(config.max_depth, 16);
        assert_eq!(config.format, OutputFormat::Bin);
    }

    #[test]
    fn test_missing_or_invalid_file_uses_defaults() {
        let config = CliConfig::from_file(Path::new("/nonexistent/ipc-wire.yaml"));
        assert_eq!(config, CliConfig::default());

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"services: [not, a, map").unwrap();
        assert_eq!(CliConfig::from_file(temp_file.path()), CliConfig::default());
    }

    #[test]
    fn test_overrides() {
        let mut config = CliConfig::default();
        config.apply_overrides(|key| match key {
            ENV_MAX_DEPTH => Some("8".to_string()),
            ENV_FORMAT => Some("BIN".to_string()),
            _ => None,
        });
        assert_eq!(config.max_depth, 8);
        assert_eq!(config.format, OutputFormat::Bin);

        config.apply_overrides(|key| (key == ENV_MAX_DEPTH).then(|| "deep".to_string()));
        assert_eq!(config.max_depth, 8);

        config.apply_args(Some(3), Some(OutputFormat::Hex));
        assert_eq!(config.max_depth, 3);
        assert_eq!(config.format, OutputFormat::Hex);
    }

    #[test]
    fn test_render() {
        assert_eq!(OutputFormat::Hex.render(&[0x06, 0xAB]), "06ab");
        assert_eq!(
            OutputFormat::Bin.render(&[0x06, 0x01]),
            "00000110_00000001"
        );
    }
}
