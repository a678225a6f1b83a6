//! Tag classification: raw relation tags → [`CountryMetadata`]
//!
//! Order of operations:
//! 1. root fields are copied out (null when absent)
//! 2. `capital`/`website` resolve with their `capital_city`/`url` fallbacks,
//!    then the administrative noise is discarded
//! 3. `ISO3166-1:*`, `name:UN:*` and `<translation field>:*` keys are routed
//!    into the subdivision and `lang` maps
//! 4. whatever is left ends up in `tags`

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use countrymeta_store::RawRelationDocument;

use crate::model::CountryMetadata;

/// Tags copied to the record root.
pub const ROOT_FIELDS: [&str; 9] = [
    "name",
    "official_name",
    "default_language",
    "flag",
    "ISO3166-2",
    "timezone",
    "currency",
    "wikidata",
    "wikipedia",
];

/// Tags removed before routing; never emitted anywhere.
pub const UNSET_FIELDS: [&str; 7] = [
    "ISO3166-1",
    "boundary",
    "capital",
    "capital_city",
    "type",
    "url",
    "website",
];

/// Fields whose `<field>:<lang>` variants are grouped under `lang`.
pub const TRANSLATION_FIELDS: [&str; 11] = [
    "alt_name",
    "alt_official_name",
    "alt_short_name",
    "long_name",
    "name",
    "official_name",
    "old_name",
    "old_official_name",
    "old_short_name",
    "short_name",
    "wikipedia",
];

const SUBDIVISION_PREFIX: &str = "iso3166-1:";
const UN_NAME_PREFIX: &str = "name:un:";
const UN_NAME_BUCKET: &str = "name:UN";

/// Translation field list used by [`reshape`].
#[derive(Debug, Clone)]
pub struct TagRules {
    pub translation_fields: Vec<String>,
}

impl Default for TagRules {
    fn default() -> Self {
        Self {
            translation_fields: TRANSLATION_FIELDS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// `key` without `prefix`, compared ASCII case-insensitively.
fn strip_prefix_ignore_case<'a>(key: &'a str, prefix: &str) -> Option<&'a str> {
    let head = key.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &key[prefix.len()..])
}

/// Build the metadata record for `code` from its relation document.
///
/// Translation prefixes are checked independently: a key matching several
/// of them is copied into every matching `lang` bucket.
pub fn reshape(
    code: &str,
    document: &RawRelationDocument,
    rules: &TagRules,
) -> Result<CountryMetadata> {
    let relation = document
        .relation()
        .with_context(|| format!("{code}: relation document has no elements"))?;
    let relation_id = document
        .relation_id()
        .with_context(|| format!("{code}: relation document has no id"))?;

    // BTreeMap: already key-sorted
    let mut tags: BTreeMap<String, String> = relation.tags.clone();
    let mut metadata = CountryMetadata::new(relation_id);

    for field in ROOT_FIELDS {
        let value = tags.remove(field);
        if let Some(slot) = metadata.root_field_mut(field) {
            *slot = value;
        }
    }

    let capital = tags.get("capital").or_else(|| tags.get("capital_city"));
    metadata.capital = capital.cloned();
    let website = tags.get("website").or_else(|| tags.get("url"));
    metadata.website = website.cloned();

    for field in UNSET_FIELDS {
        tags.remove(field);
    }

    let mut leftover = BTreeMap::new();
    for (key, value) in tags {
        if let Some(region) = strip_prefix_ignore_case(&key, SUBDIVISION_PREFIX) {
            metadata
                .iso3166_1
                .insert(region.to_string(), value.to_ascii_uppercase());
            continue;
        }

        if let Some(lang) = strip_prefix_ignore_case(&key, UN_NAME_PREFIX) {
            metadata
                .lang
                .entry(UN_NAME_BUCKET.to_string())
                .or_default()
                .insert(lang.to_string(), value);
            continue;
        }

        let mut consumed = false;
        for field in &rules.translation_fields {
            let Some(lang) = strip_prefix_ignore_case(&key, field).and_then(|r| r.strip_prefix(':'))
            else {
                continue;
            };
            metadata
                .lang
                .entry(field.clone())
                .or_default()
                .insert(lang.to_string(), value.clone());
            consumed = true;
        }

        if !consumed {
            leftover.insert(key, value);
        }
    }
    metadata.tags = leftover;

    log::info!(
        "processed: [{code}] {}",
        metadata.name.as_deref().unwrap_or_default()
    );
    Ok(metadata)
}
