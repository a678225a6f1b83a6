//! OSM relation documents as returned by the API v0.6 JSON endpoint

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// OpenStreetMap relation identifier
pub type RelationId = u64;

/// ISO3166-1 alpha-3 code → relation id, iterated in key order.
pub type RelationIndex = BTreeMap<String, RelationId>;

/// Tag carrying the alpha-3 code used as index key
pub const ALPHA3_TAG: &str = "ISO3166-1:alpha3";

/// Body of `GET /api/0.6/relation/{id}.json`.
///
/// Only the fields the pipeline interprets are modelled; the store keeps the
/// raw bytes, so nothing else is lost.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRelationDocument {
    #[serde(default)]
    pub elements: Vec<RelationElement>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelationElement {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,

    #[serde(default)]
    pub id: Option<RelationId>,

    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

impl RawRelationDocument {
    /// Decode a raw response body.
    pub fn from_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }

    /// The relation itself (the endpoint returns exactly one element).
    pub fn relation(&self) -> Option<&RelationElement> {
        self.elements.first()
    }

    /// Relation id of the first element, if present and non-zero.
    pub fn relation_id(&self) -> Option<RelationId> {
        self.relation().and_then(|e| e.id).filter(|&id| id > 0)
    }

    /// Upper-cased `ISO3166-1:alpha3` tag of the first element, if non-empty.
    pub fn alpha3(&self) -> Option<String> {
        self.relation()
            .and_then(|e| e.tags.get(ALPHA3_TAG))
            .map(|code| code.trim().to_ascii_uppercase())
            .filter(|code| !code.is_empty())
    }
}
