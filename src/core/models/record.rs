//! Static dataset record

use serde::{Deserialize, Serialize};

/// One entry of a static CWE view dataset, as stored on disk.
///
/// Leaves omit `children` entirely, matching the files produced by `cwetree import`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CweRecord {
    /// CWE identifier (e.g., "89"); the root carries the view id
    pub cid: String,

    /// Display name of the weakness or view
    pub name: String,

    /// Child entries in catalog order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<CweRecord>,
}

impl CweRecord {
    /// Create a leaf record
    #[must_use]
    pub fn leaf(cid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            cid: cid.into(),
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Create a record with children
    #[must_use]
    pub fn with_children(
        cid: impl Into<String>,
        name: impl Into<String>,
        children: Vec<Self>,
    ) -> Self {
        Self {
            cid: cid.into(),
            name: name.into(),
            children,
        }
    }

    /// Total number of records in this subtree, including `self`
    #[must_use]
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Self::count).sum::<usize>()
    }
}
