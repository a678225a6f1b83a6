//! JSON artifact output
//!
//! Both artifacts are tab-indented with sorted keys at every level. serde_json
//! never escapes `/` or non-ASCII characters, so URLs and native names are
//! written literally.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use countrymeta_store::RelationIndex;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::model::MetadataDocument;

/// Code → relation id artifact
pub const RELATION_INDEX_FILE: &str = "osm-country-relation-ids.json";

/// Code → metadata artifact
pub const METADATA_FILE: &str = "osm-country-metadata.json";

/// Serialize `value` as tab-indented JSON.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"\t");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser).context("JSON serialization failed")?;
    Ok(buf)
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let bytes = to_pretty_json(value)?;
    countrymeta_core::write_atomic(path, &bytes)
        .with_context(|| format!("failed to write {}", path.display()))?;
    log::info!("Wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

/// Write the relation index to `<output_dir>/osm-country-relation-ids.json`.
pub fn write_relation_index(output_dir: &Path, index: &RelationIndex) -> Result<PathBuf> {
    let path = output_dir.join(RELATION_INDEX_FILE);
    write_json(&path, index)?;
    Ok(path)
}

/// Write the metadata to `<output_dir>/osm-country-metadata.json`.
pub fn write_metadata(output_dir: &Path, metadata: &MetadataDocument) -> Result<PathBuf> {
    let path = output_dir.join(METADATA_FILE);
    write_json(&path, metadata)?;
    Ok(path)
}

/// Load a relation index written by a previous run.
pub fn read_relation_index(path: &Path) -> Result<RelationIndex> {
    let content =
        fs::read(path).with_context(|| format!("Cannot read {}", path.display()))?;
    serde_json::from_slice(&content)
        .with_context(|| format!("Invalid relation index JSON in {}", path.display()))
}
