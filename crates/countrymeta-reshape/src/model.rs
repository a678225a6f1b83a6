//! Normalized country metadata record

use std::collections::BTreeMap;

use countrymeta_store::RelationId;
use serde::{Deserialize, Serialize};

/// Country code → metadata, serialized in key order.
pub type MetadataDocument = BTreeMap<String, CountryMetadata>;

/// Translation field → language tag → value
pub type LangMap = BTreeMap<String, BTreeMap<String, String>>;

/// Metadata for one country.
///
/// Fields are declared in ascending byte order of their JSON names, so the
/// serialized object is key-sorted like every map inside it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryMetadata {
    /// Region key (`alpha2`, `alpha3`, `numeric`, ...) → upper-cased value
    #[serde(rename = "ISO3166-1")]
    pub iso3166_1: BTreeMap<String, String>,

    #[serde(rename = "ISO3166-2")]
    pub iso3166_2: Option<String>,

    pub capital: Option<String>,
    pub currency: Option<String>,
    pub default_language: Option<String>,
    pub flag: Option<String>,
    pub lang: LangMap,
    pub name: Option<String>,
    pub official_name: Option<String>,
    pub relation_id: RelationId,

    /// Tags no rule claimed
    pub tags: BTreeMap<String, String>,

    pub timezone: Option<String>,
    pub website: Option<String>,
    pub wikidata: Option<String>,
    pub wikipedia: Option<String>,
}

impl CountryMetadata {
    pub fn new(relation_id: RelationId) -> Self {
        Self {
            relation_id,
            ..Default::default()
        }
    }

    /// Slot for a root-level tag, by its tag name.
    pub fn root_field_mut(&mut self, tag: &str) -> Option<&mut Option<String>> {
        match tag {
            "name" => Some(&mut self.name),
            "official_name" => Some(&mut self.official_name),
            "default_language" => Some(&mut self.default_language),
            "flag" => Some(&mut self.flag),
            "ISO3166-2" => Some(&mut self.iso3166_2),
            "timezone" => Some(&mut self.timezone),
            "currency" => Some(&mut self.currency),
            "wikidata" => Some(&mut self.wikidata),
            "wikipedia" => Some(&mut self.wikipedia),
            _ => None,
        }
    }
}
