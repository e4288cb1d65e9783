//! @acp:module "Errors"
//! @acp:summary "Error taxonomy for sampling, layout, assembly and export"
//! @acp:domain dataset
//! @acp:layer types

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, BridgeError>;

/// @acp:summary "All failures raised by the bridge generation core"
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Structurally inconsistent or unsupported field value
    #[error("invalid configuration{}: `{field}` {reason}", bridge_suffix(.bridge_id))]
    InvalidConfiguration {
        bridge_id: Option<String>,
        field: String,
        reason: String,
    },

    /// Attribute required by the chosen variant is absent
    #[error("missing parameter{}: `{field}` is required for {variant}", bridge_suffix(.bridge_id))]
    MissingParameter {
        bridge_id: Option<String>,
        field: String,
        variant: String,
    },

    /// Assembly produced no components at all
    #[error("empty assembly for {bridge_id}: no components were produced")]
    EmptyAssembly { bridge_id: String },

    /// Mesh could not be written (degenerate or empty)
    #[error("export failed for {}: {reason}", .path.display())]
    ExportFailure { path: PathBuf, reason: String },

    #[error("geometry error: {0}")]
    Geometry(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

fn bridge_suffix(bridge_id: &Option<String>) -> String {
    match bridge_id {
        Some(id) => format!(" for {}", id),
        None => String::new(),
    }
}

impl BridgeError {
    /// @acp:summary "Shorthand for an InvalidConfiguration without a bridge id"
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        BridgeError::InvalidConfiguration {
            bridge_id: None,
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// @acp:summary "Shorthand for a MissingParameter without a bridge id"
    pub fn missing(field: impl Into<String>, variant: impl Into<String>) -> Self {
        BridgeError::MissingParameter {
            bridge_id: None,
            field: field.into(),
            variant: variant.into(),
        }
    }

    /// @acp:summary "Attach the offending bridge id if none is recorded yet"
    pub fn for_bridge(self, id: &str) -> Self {
        match self {
            BridgeError::InvalidConfiguration { bridge_id: None, field, reason } => {
                BridgeError::InvalidConfiguration {
                    bridge_id: Some(id.to_string()),
                    field,
                    reason,
                }
            }
            BridgeError::MissingParameter { bridge_id: None, field, variant } => {
                BridgeError::MissingParameter {
                    bridge_id: Some(id.to_string()),
                    field,
                    variant,
                }
            }
            other => other,
        }
    }

    /// Name of the offending field, when the error is about one
    pub fn field(&self) -> Option<&str> {
        match self {
            BridgeError::InvalidConfiguration { field, .. }
            | BridgeError::MissingParameter { field, .. } => Some(field),
            _ => None,
        }
    }

    /// True for failures that should make the CLI exit non-zero
    pub fn is_fatal(&self) -> bool {
        !matches!(self, BridgeError::ExportFailure { .. })
    }
}
