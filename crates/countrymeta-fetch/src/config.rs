//! Fetch pipeline configuration

use countrymeta_store::RelationId;

/// Overpass API interpreter endpoint
pub const OVERPASS_API: &str = "https://overpass-api.de/api/interpreter";

/// OSM API v0.6 relation endpoint; `{id}` is replaced by the relation id
pub const RELATION_API: &str = "https://api.openstreetmap.org/api/0.6/relation/{id}.json";

/// Overpass QL selecting every relation that carries an ISO3166-1 code
pub const ID_QUERY: &str = r#"[out:json];(relation["type"="boundary"]["boundary"="administrative"]["ISO3166-1"];);out ids;"#;

/// Relations the query misses but the output must contain.
pub const SUPPLEMENTARY_RELATIONS: &[RelationId] = &[
    2186646, // ATA: Antarctica is not an administrative boundary
    1703814, // PSE: Palestine is tagged without ISO3166-1 on the boundary
];

/// Runtime configuration for the fetch pipeline
#[derive(Debug, Clone)]
pub struct Config {
    /// Overpass interpreter URL
    pub overpass_url: String,
    /// Overpass QL sent as POST body
    pub id_query: String,
    /// Relation URL template containing `{id}`
    pub relation_url: String,
    /// Appended to the discovered ids unconditionally
    pub supplementary_ids: Vec<RelationId>,
    /// Parallel relation requests
    pub workers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            overpass_url: OVERPASS_API.to_string(),
            id_query: ID_QUERY.to_string(),
            relation_url: RELATION_API.to_string(),
            supplementary_ids: SUPPLEMENTARY_RELATIONS.to_vec(),
            workers: 4,
        }
    }
}

impl Config {
    /// Expand the relation URL template for `id`.
    pub fn relation_url(&self, id: RelationId) -> String {
        self.relation_url.replace("{id}", &id.to_string())
    }
}
