//! countrymeta-store: Relation documents and their on-disk cache
//!
//! Holds the data model shared by the fetch and reshape stages and the
//! Relation Store, a write-once key/blob store of raw API responses keyed
//! by relation id.

pub mod document;
pub mod relations;

pub use document::{ALPHA3_TAG, RawRelationDocument, RelationElement, RelationId, RelationIndex};
pub use relations::RelationStore;
