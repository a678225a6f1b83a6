//! Relation Store: one raw JSON document per relation id
//!
//! Directory layout:
//! ```text
//! {build_dir}/
//! └── relations/
//!     ├── 2202162.json    # verbatim API response
//!     └── ...
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::document::{RawRelationDocument, RelationId};

/// Write-once key/blob store scoped to one build directory.
#[derive(Debug, Clone)]
pub struct RelationStore {
    dir: PathBuf,
}

impl RelationStore {
    /// Open (and create) the store under `build_dir`.
    pub fn open(build_dir: &Path) -> Result<Self> {
        let dir = build_dir.join("relations");
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create relation dir: {}", dir.display()))?;
        countrymeta_core::cleanup_tmp_files(&dir)
            .with_context(|| format!("failed to clean {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Location of the document for `id`.
    pub fn path(&self, id: RelationId) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    /// Persist the exact response bytes for `id`.
    pub fn put(&self, id: RelationId, raw: &[u8]) -> Result<()> {
        let path = self.path(id);
        countrymeta_core::write_atomic(&path, raw)
            .with_context(|| format!("failed to write {}", path.display()))
    }

    /// Read and decode the document for `id`.
    pub fn get(&self, id: RelationId) -> Result<RawRelationDocument> {
        let path = self.path(id);
        let bytes =
            fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?;
        RawRelationDocument::from_slice(&bytes)
            .with_context(|| format!("invalid relation JSON in {}", path.display()))
    }

    pub fn contains(&self, id: RelationId) -> bool {
        self.path(id).is_file()
    }

    /// Ids of all cached documents, ascending.
    pub fn list(&self) -> Result<Vec<RelationId>> {
        let pattern = self.dir.join("*.json");
        let pattern_str = pattern.to_string_lossy();

        let mut ids: Vec<RelationId> = glob::glob(&pattern_str)
            .context("invalid glob pattern")?
            .filter_map(|e| e.ok())
            .filter_map(|p| p.file_stem()?.to_str()?.parse().ok())
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }

    /// Delete every cached document. Returns the number removed.
    pub fn clear(&self) -> Result<usize> {
        let ids = self.list()?;
        for &id in &ids {
            let path = self.path(id);
            fs::remove_file(&path)
                .with_context(|| format!("failed to remove {}", path.display()))?;
        }
        log::info!("Removed {} cached relations from {}", ids.len(), self.dir.display());
        Ok(ids.len())
    }
}
