//! The three CWE views a session can display

use crate::core::error::CweTreeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named dataset variants, keyed by their CWE view identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ViewId {
    /// CWE-699, Development Concepts
    #[serde(rename = "699")]
    Development,
    /// CWE-1000, Research Concepts
    #[serde(rename = "1000")]
    Research,
    /// CWE-1008, Architectural Concepts
    #[serde(rename = "1008")]
    Architectural,
}

impl ViewId {
    /// All views in selector order
    pub const ALL: [Self; 3] = [Self::Development, Self::Research, Self::Architectural];

    /// Numeric identifier as used in file names and the catalog
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Development => "699",
            Self::Research => "1000",
            Self::Architectural => "1008",
        }
    }

    /// Human readable view name, used as the root label on import
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Development => "Development Concepts",
            Self::Research => "Research Concepts",
            Self::Architectural => "Architectural Concepts",
        }
    }

    /// The view after this one, wrapping around
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Development => Self::Research,
            Self::Research => Self::Architectural,
            Self::Architectural => Self::Development,
        }
    }

    /// Look up a view by identifier; `None` for anything unknown
    #[must_use]
    pub fn lookup(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|view| view.id() == id.trim())
    }
}

impl FromStr for ViewId {
    type Err = CweTreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup(s).ok_or_else(|| CweTreeError::UnknownView(s.to_string()))
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
