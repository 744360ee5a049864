//! Persisted metric table artifacts.
//!
//! A metric table bundles everything an offline build produced for one
//! (charset, font, size) configuration: build metadata, the raw density
//! map, the ordered ramp, and the 256-entry LUT. Tables are written once
//! at build time and loaded read-only at render time; renderers only need
//! `lut`, while `metrics` and `ramp` are retained for introspection.

use crate::glyph::GlyphDensityMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while persisting or loading metric tables.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read metric table '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse metric table '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("no metric table for charset '{label}' in '{}'; run `glyphcast build-metrics` first", .dir.display())]
    NotFound { label: String, dir: PathBuf },
}

/// Build metadata recorded alongside the measured data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableMeta {
    pub charset_label: String,
    pub font_name: String,
    pub font_path: String,
    pub font_size: u32,
    pub canvas_size: u32,
    pub threshold: u8,
    pub chars_count: usize,
    /// RFC 3339 build timestamp
    pub created_at: String,
}

/// The persisted bundle: metadata, density map, ramp, and LUT.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricTable {
    pub meta: TableMeta,
    pub metrics: GlyphDensityMap,
    pub ramp: Vec<char>,
    pub lut: Vec<char>,
}

impl MetricTable {
    /// Artifact file name: `{label}__{font_stem}_{size}.json`.
    pub fn file_name(&self) -> String {
        let font_stem = Path::new(&self.meta.font_name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.meta.font_name.clone());
        format!(
            "{}__{}_{}.json",
            self.meta.charset_label, font_stem, self.meta.font_size
        )
    }

    /// Write the table as pretty-printed JSON under `dir`, creating the
    /// directory if needed. Returns the path written.
    pub fn save(&self, dir: &Path) -> Result<PathBuf, StoreError> {
        std::fs::create_dir_all(dir).map_err(|e| StoreError::Io {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let path = dir.join(self.file_name());
        // Infallible for this data model; map anyway to keep the path in
        // any error we do surface.
        let json = serde_json::to_string_pretty(self).map_err(|e| StoreError::Parse {
            path: path.clone(),
            source: e,
        })?;
        std::fs::write(&path, json).map_err(|e| StoreError::Io {
            path: path.clone(),
            source: e,
        })?;

        Ok(path)
    }

    /// Load a table from a JSON artifact.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let content = std::fs::read_to_string(path).map_err(|e| StoreError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(|e| StoreError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Scan a metrics directory and map each charset label to its first
/// artifact (paths are visited in sorted order, so the mapping is
/// deterministic). Non-JSON files and files without the `__` label
/// separator are ignored.
pub fn discover(dir: &Path) -> Result<BTreeMap<String, PathBuf>, StoreError> {
    let entries = std::fs::read_dir(dir).map_err(|e| StoreError::Io {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    let mut mapping = BTreeMap::new();
    for path in paths {
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };
        let Some((label, _)) = name.split_once("__") else {
            continue;
        };
        mapping.entry(label.to_string()).or_insert(path);
    }

    Ok(mapping)
}

/// Resolve a charset label to its artifact path under `dir`.
pub fn find(dir: &Path, label: &str) -> Result<PathBuf, StoreError> {
    discover(dir)?
        .remove(label)
        .ok_or_else(|| StoreError::NotFound {
            label: label.to_string(),
            dir: dir.to_path_buf(),
        })
}
