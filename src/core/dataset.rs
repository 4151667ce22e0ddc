//! Loading the static view datasets
//!
//! A dataset is one nested `{cid, name, children}` record per view. On disk it
//! lives at `<data_dir>/<view>.json`; the older generated form
//! `var view_<view> = {...};` is accepted as well.

use crate::core::error::{CweTreeError, Result};
use crate::core::models::{CweRecord, ViewId};
use crate::debug;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Provides the record for a view
pub trait DatasetSource {
    /// Load the dataset for `view`
    ///
    /// # Errors
    /// Returns an error if the dataset is missing or malformed
    fn load(&self, view: ViewId) -> Result<CweRecord>;
}

/// Parse dataset text, accepting plain JSON or the `var view_N = ...;` wrapper
///
/// # Errors
/// Returns an error if the payload is not a valid record
pub fn parse_dataset(text: &str) -> Result<CweRecord> {
    let payload = strip_js_assignment(text);
    Ok(serde_json::from_str(payload)?)
}

fn strip_js_assignment(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("var ") else {
        return trimmed;
    };
    rest.split_once('=')
        .map_or(trimmed, |(_, value)| value.trim().trim_end_matches(';').trim_end())
}

/// Serialize a record as dataset JSON
///
/// # Errors
/// Returns an error if serialization fails
pub fn to_dataset_json(record: &CweRecord, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(record)?
    } else {
        serde_json::to_string(record)?
    };
    Ok(json)
}

/// File name of a view's dataset
#[must_use]
pub fn dataset_file_name(view: ViewId) -> String {
    format!("{}.json", view.id())
}

/// Datasets stored as files in one directory
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    /// Read datasets from `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory being read
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Candidate paths for a view, in lookup order
    #[must_use]
    pub fn candidates(&self, view: ViewId) -> [PathBuf; 2] {
        [
            self.dir.join(dataset_file_name(view)),
            self.dir.join(format!("{}.js", view.id())),
        ]
    }

    /// Views that have a dataset file present
    #[must_use]
    pub fn available(&self) -> Vec<ViewId> {
        ViewId::ALL
            .into_iter()
            .filter(|&view| self.candidates(view).iter().any(|path| path.is_file()))
            .collect()
    }

    /// Write a view's dataset into the directory, creating it if needed
    ///
    /// # Errors
    /// Returns an error if the directory or file cannot be written
    pub fn store(&self, view: ViewId, record: &CweRecord) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).map_err(|e| CweTreeError::io(&self.dir, e))?;
        let path = self.dir.join(dataset_file_name(view));
        fs::write(&path, to_dataset_json(record, false)?)
            .map_err(|e| CweTreeError::io(&path, e))?;
        Ok(path)
    }
}

impl DatasetSource for DirectorySource {
    fn load(&self, view: ViewId) -> Result<CweRecord> {
        let [json, js] = self.candidates(view);
        let path = if json.is_file() || !js.is_file() { json } else { js };
        debug!("Reading dataset {}", path.display());
        let text = fs::read_to_string(&path).map_err(|e| CweTreeError::io(&path, e))?;
        parse_dataset(&text)
    }
}

/// Datasets held in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    records: HashMap<ViewId, CweRecord>,
}

impl MemorySource {
    /// Empty source
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a view's record
    #[must_use]
    pub fn with(mut self, view: ViewId, record: CweRecord) -> Self {
        self.records.insert(view, record);
        self
    }
}

impl DatasetSource for MemorySource {
    fn load(&self, view: ViewId) -> Result<CweRecord> {
        self.records
            .get(&view)
            .cloned()
            .ok_or_else(|| CweTreeError::UnknownView(view.id().to_string()))
    }
}
