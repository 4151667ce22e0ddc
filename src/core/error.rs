//! Error type shared by the library operations

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across `cwetree`
pub type Result<T> = std::result::Result<T, CweTreeError>;

/// Errors raised while loading, importing or exporting trees
#[derive(Debug, Error)]
pub enum CweTreeError {
    /// Filesystem failure, with the path that was being accessed
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path being read or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
    /// Dataset JSON could not be parsed or written
    #[error("invalid dataset JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// CWE catalog XML could not be parsed
    #[error("invalid CWE catalog XML: {0}")]
    Xml(String),
    /// The catalog contained no weaknesses
    #[error("catalog contains no weaknesses")]
    EmptyCatalog,
    /// View identifier is not one of 699, 1000, 1008
    #[error("unknown view '{0}' (expected 699, 1000 or 1008)")]
    UnknownView(String),
    /// Format name not recognised
    #[error("unknown export format '{0}' (expected html, markdown or json)")]
    UnknownFormat(String),
}

impl CweTreeError {
    /// Wrap an I/O error with the path it concerns
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<quick_xml::Error> for CweTreeError {
    fn from(err: quick_xml::Error) -> Self {
        Self::Xml(err.to_string())
    }
}
