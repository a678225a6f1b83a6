//! Reshape every indexed relation from the store

use std::time::Instant;

use anyhow::{Context, Result};
use countrymeta_store::{RelationIndex, RelationStore};
use rayon::prelude::*;

use crate::classify::{TagRules, reshape};
use crate::model::MetadataDocument;

/// Build one metadata record per index entry.
///
/// Records are produced in parallel and collected into a key-sorted map, so
/// the result does not depend on scheduling. A missing or inconsistent
/// cached document is an error: every indexed code must yield a record.
pub fn run(
    index: &RelationIndex,
    store: &RelationStore,
    rules: &TagRules,
) -> Result<MetadataDocument> {
    let start = Instant::now();
    log::info!("Reshaping {} relations", index.len());

    let metadata: MetadataDocument = index
        .par_iter()
        .map(|(code, &id)| {
            let document = store
                .get(id)
                .with_context(|| format!("{code}: cached relation {id} unavailable"))?;
            let record = reshape(code, &document, rules)?;
            anyhow::ensure!(
                record.relation_id == id,
                "{code}: cached document {id} holds relation {}",
                record.relation_id
            );
            Ok((code.clone(), record))
        })
        .collect::<Result<_>>()?;

    log::info!(
        "Reshaped {} countries in {:.1}s",
        metadata.len(),
        start.elapsed().as_secs_f64()
    );
    Ok(metadata)
}
