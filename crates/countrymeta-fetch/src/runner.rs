//! Main runner for the fetch pipeline

use std::time::{Duration, Instant};

use anyhow::Result;
use countrymeta_core::{ProgressContext, Transport};
use countrymeta_store::RelationStore;

use crate::config::Config;
use crate::discovery::discover_relation_ids;
use crate::fetcher::{FetchOutcome, fetch_relations};

/// Pipeline execution summary
#[derive(Debug)]
pub struct FetchSummary {
    /// Ids requested (discovered + supplementary)
    pub discovered: usize,
    pub outcome: FetchOutcome,
    pub elapsed: Duration,
}

impl FetchSummary {
    pub fn log(&self) {
        let o = &self.outcome;
        log::info!("=== Fetch Summary ===");
        log::info!(
            "Relations: {}/{} indexed ({} dropped)",
            o.index.len(),
            self.discovered,
            o.dropped()
        );
        if o.dropped() > 0 {
            log::info!(
                "Dropped: {} empty, {} invalid, {} rejected, {} exhausted",
                o.empty,
                o.invalid,
                o.rejected,
                o.exhausted
            );
        }
        log::info!("Retries: {}", o.retried);
        log::info!("Time: {:.1}s", self.elapsed.as_secs_f64());
    }
}

/// Run discovery and download every relation into `store`.
///
/// Fails only when discovery fails or the store cannot be written.
pub fn run<T: Transport + ?Sized>(
    config: &Config,
    transport: &T,
    store: &RelationStore,
    progress: &ProgressContext,
) -> Result<FetchSummary> {
    let start = Instant::now();

    let line = progress.stage_line("discover");
    line.set_message("querying Overpass API...");
    let ids = discover_relation_ids(transport, config);
    line.finish_and_clear();
    let ids = ids?;

    let pb = progress.counter_bar("fetch", ids.len() as u64);
    let outcome = fetch_relations(&ids, config, transport, store, &pb);
    pb.finish_and_clear();

    let summary = FetchSummary {
        discovered: ids.len(),
        outcome: outcome?,
        elapsed: start.elapsed(),
    };
    summary.log();
    Ok(summary)
}
