//! Input discovery and loading.
//!
//! Inputs are JSON files holding either one simulation record or an array of
//! them. Directories are walked recursively for record files, and the
//! reference pattern file is never mistaken for a record.

use crate::models::{ReferencePattern, SimulationResult};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

/// Configuration for input discovery.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// File extensions to include (e.g., ["json"])
    pub extensions: Vec<String>,
    /// Names to exclude
    pub excludes: Vec<String>,
    /// Maximum file size in bytes
    pub max_file_size: u64,
    /// Maximum number of files taken from one directory
    pub max_files: Option<usize>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::from(&crate::config::InputConfig::default())
    }
}

impl From<&crate::config::InputConfig> for ScanConfig {
    fn from(config: &crate::config::InputConfig) -> Self {
        Self {
            extensions: config.extensions.clone(),
            excludes: config.excludes.clone(),
            max_file_size: config.max_file_size,
            max_files: Some(config.max_files),
        }
    }
}

/// A record file holds one record or a list of them.
#[derive(Deserialize)]
#[serde(untagged)]
enum RecordFile {
    Many(Vec<SimulationResult>),
    One(Box<SimulationResult>),
}

/// Records loaded from one file.
#[derive(Debug, Clone)]
pub struct LoadedFile {
    pub path: PathBuf,
    pub records: Vec<SimulationResult>,
}

/// Discovers and loads simulation record files.
pub struct InputScanner {
    config: ScanConfig,
}

impl InputScanner {
    /// Create a new input scanner.
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Expand `inputs` into record files, in order. Explicit files are kept
    /// as given; directories contribute their matching files sorted by path.
    pub fn discover(&self, inputs: &[PathBuf], skip: Option<&Path>) -> Result<Vec<PathBuf>> {
        let skip = skip.map(canonical);
        let mut files = Vec::new();

        for input in inputs {
            if input.is_dir() {
                let mut found = self.walk_dir(input)?;
                found.retain(|f| skip.as_deref() != Some(canonical(f).as_path()));
                debug!("Found {} record files in {}", found.len(), input.display());
                files.extend(found);
            } else if skip.as_deref() == Some(canonical(input).as_path()) {
                warn!("Skipping reference file given as input: {}", input.display());
            } else {
                files.push(input.clone());
            }
        }

        Ok(files)
    }

    /// Discover and load every record, preserving input order.
    pub fn load(&self, inputs: &[PathBuf], skip: Option<&Path>) -> Result<Vec<LoadedFile>> {
        let files = self.discover(inputs, skip)?;
        let mut loaded = Vec::with_capacity(files.len());

        for path in files {
            let records = load_records(&path)?;
            info!("Loaded {} record(s) from {}", records.len(), path.display());
            loaded.push(LoadedFile { path, records });
        }

        Ok(loaded)
    }

    /// Check if a file matches scan criteria.
    pub fn matches(&self, path: &Path) -> bool {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if !self.config.extensions.iter().any(|e| e == ext) {
            return false;
        }

        match fs::metadata(path) {
            Ok(metadata) => metadata.len() <= self.config.max_file_size,
            Err(_) => false,
        }
    }

    /// Check if a name matches exclusion patterns.
    fn is_excluded(&self, name: &str) -> bool {
        // Hidden files
        if name.starts_with('.') {
            return true;
        }

        self.config.excludes.iter().any(|pattern| name == pattern)
    }

    fn walk_dir(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry: &DirEntry| {
                entry.depth() == 0 || !self.is_excluded(&entry.file_name().to_string_lossy())
            });

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry.with_context(|| format!("Failed to scan {}", root.display()))?;
            if entry.file_type().is_file() && self.matches(entry.path()) {
                files.push(entry.into_path());
            }

            if let Some(max) = self.config.max_files {
                if files.len() >= max {
                    warn!("Stopped scanning {} after {} files", root.display(), max);
                    break;
                }
            }
        }

        Ok(files)
    }
}

fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Load the records stored in one JSON file.
pub fn load_records(path: &Path) -> Result<Vec<SimulationResult>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read record file: {}", path.display()))?;

    let parsed: RecordFile = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse record file: {}", path.display()))?;

    Ok(match parsed {
        RecordFile::Many(records) => records,
        RecordFile::One(record) => vec![*record],
    })
}

/// Load a reference attribute pattern matrix.
pub fn load_reference(path: &Path) -> Result<ReferencePattern> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read reference file: {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse reference file: {}", path.display()))
}
