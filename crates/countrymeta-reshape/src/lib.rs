//! Countrymeta Reshape - tag classification and artifact output
//!
//! Turns cached relation documents into normalized per-country metadata
//! and writes the two JSON artifacts.

pub mod classify;
pub mod model;
pub mod runner;
pub mod writer;

pub use classify::{TagRules, reshape};
pub use model::{CountryMetadata, MetadataDocument};
pub use runner::run;
pub use writer::{
    METADATA_FILE, RELATION_INDEX_FILE, read_relation_index, to_pretty_json, write_metadata,
    write_relation_index,
};
