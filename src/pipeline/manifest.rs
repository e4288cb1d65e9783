//! @acp:module "Run Manifest"
//! @acp:summary "Per-bridge outcomes and the run_manifest.json record"
//! @acp:domain dataset
//! @acp:layer model

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{BridgeError, Result};

pub const MANIFEST_FILE_NAME: &str = "run_manifest.json";

/// @acp:summary "What happened to one bridge"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeOutcome {
    pub bridge_id: String,
    pub built: bool,
    /// Error that stopped the build, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Non-fatal problems, such as a mesh that could not be exported
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<PathBuf>,
}

impl BridgeOutcome {
    pub fn built(bridge_id: impl Into<String>) -> Self {
        Self {
            bridge_id: bridge_id.into(),
            built: true,
            error: None,
            warnings: Vec::new(),
            files: Vec::new(),
        }
    }

    pub fn failed(bridge_id: impl Into<String>, error: &BridgeError) -> Self {
        Self {
            bridge_id: bridge_id.into(),
            built: false,
            error: Some(error.to_string()),
            warnings: Vec::new(),
            files: Vec::new(),
        }
    }

    pub fn is_failure(&self) -> bool {
        !self.built
    }
}

/// @acp:summary "Provenance and totals for one generation run"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunManifest {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub generator_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub profile: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bridge_type: Option<String>,
    pub include_components: bool,
    pub requested: usize,
    pub built: usize,
    pub failed: usize,
    pub outcomes: Vec<BridgeOutcome>,
}

impl RunManifest {
    pub fn failures(&self) -> impl Iterator<Item = &BridgeOutcome> {
        self.outcomes.iter().filter(|o| o.is_failure())
    }

    /// Write as pretty JSON
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_serialization_skips_empty_fields() {
        let value = serde_json::to_value(BridgeOutcome::built("bridge_1")).unwrap();
        assert_eq!(value, serde_json::json!({ "bridgeId": "bridge_1", "built": true }));
    }

    #[test]
    fn test_failed_outcome_keeps_message() {
        let err = BridgeError::invalid("lanes", "must be at least 2, got 1").for_bridge("bridge_4");
        let outcome = BridgeOutcome::failed("bridge_4", &err);
        assert!(outcome.is_failure());
        assert!(outcome.error.unwrap().contains("bridge_4"));
    }
}
