//! @acp:module "Configuration"
//! @acp:summary "Generator configuration loading and defaults (bridgegen.config.json)"
//! @acp:domain cli
//! @acp:layer config

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::geometry::CIRCLE_SEGMENTS;
use crate::layout::LayoutOptions;
use crate::sampler::SamplerOptions;

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "bridgegen.config.json";

fn default_version() -> String {
    "1.0.0".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("Generated_Bridges")
}

fn default_workers() -> usize {
    1
}

/// @acp:summary "Main generator configuration"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Config format version
    #[serde(default = "default_version")]
    pub version: String,

    /// Root of the generated dataset
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Configuration sampling
    #[serde(default)]
    pub sampling: SamplingConfig,

    /// Component presence
    #[serde(default)]
    pub layout: LayoutOptions,

    /// Mesh export
    #[serde(default)]
    pub export: ExportConfig,

    /// Parallel bridge builds (1 = sequential)
    #[serde(default = "default_workers")]
    pub workers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            output_dir: default_output_dir(),
            sampling: SamplingConfig::default(),
            layout: LayoutOptions::default(),
            export: ExportConfig::default(),
            workers: default_workers(),
        }
    }
}

impl Config {
    /// @acp:summary "Load config from a JSON file"
    pub fn load<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// @acp:summary "Save config to a file"
    pub fn save<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// @acp:summary "Load from the given path, falling back to defaults when absent"
    ///
    /// A file that exists but does not parse is still an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }
}

/// @acp:summary "Sampling section"
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplingConfig {
    #[serde(flatten)]
    pub options: SamplerOptions,

    /// Seed used when the command line does not give one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_circle_segments() -> usize {
    CIRCLE_SEGMENTS
}

/// @acp:summary "Export section"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportConfig {
    /// Keep the intermediate STL next to each OBJ
    #[serde(default)]
    pub keep_stl: bool,

    /// Polygon sides used for round pier columns (minimum 3)
    #[serde(default = "default_circle_segments")]
    pub circle_segments: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            keep_stl: false,
            circle_segments: default_circle_segments(),
        }
    }
}
