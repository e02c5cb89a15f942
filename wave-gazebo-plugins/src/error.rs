//! Error types for parameter extraction, SDF parsing and message decoding.

use std::path::PathBuf;

/// Failure to resolve a named parameter from a tree or a message.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParamError {
    /// No element or message entry carries the requested name.
    #[error("parameter <{name}> not found")]
    NotFound { name: String },

    /// The entry exists but its value does not convert to the requested type.
    #[error("parameter <{name}> has value <{found}> which is not a valid {expected}")]
    ParseMismatch {
        name: String,
        expected: &'static str,
        found: String,
    },
}

impl ParamError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SdfError {
    #[error("failed to parse SDF: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("failed to read SDF file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum MsgError {
    #[error("CDR encoding failed: {0}")]
    Cdr(#[from] cdr::Error),

    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to read parameter file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid parameter file: {0}")]
    Shape(String),
}

pub type Result<T, E = ParamError> = std::result::Result<T, E>;
