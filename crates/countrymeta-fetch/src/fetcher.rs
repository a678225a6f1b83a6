//! Concurrent relation download
//!
//! A bounded pool of worker threads claims requests from a [`RetryQueue`]
//! and performs the HTTP calls. Completions travel over a channel to the
//! calling thread, which classifies them one at a time and requeues the
//! transient failures. The call returns once the queue is drained.

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::thread;

use anyhow::Result;
use countrymeta_core::{HttpError, HttpResponse, RetryQueue, Transport, http_config};
use countrymeta_store::{RelationId, RelationIndex, RelationStore};
use indicatif::ProgressBar;

use crate::config::Config;
use crate::handler::{DropReason, Outcome, ResponseHandler};

/// One relation GET, resubmitted unchanged on transient failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub id: RelationId,
    pub url: String,
    /// Resubmissions so far
    pub retries: u32,
}

impl FetchRequest {
    pub fn new(id: RelationId, url: String) -> Self {
        Self {
            id,
            url,
            retries: 0,
        }
    }
}

/// A request paired with what the transport returned for it.
struct Completion {
    request: FetchRequest,
    result: Result<HttpResponse, HttpError>,
}

/// Result of the fetch phase.
#[derive(Debug, Default)]
pub struct FetchOutcome {
    /// Code → relation id for every stored relation, sorted by code
    pub index: RelationIndex,
    pub requested: usize,
    /// Resubmissions after transient failures
    pub retried: usize,
    pub empty: usize,
    pub invalid: usize,
    pub rejected: usize,
    /// Requests still failing after `max_retries` resubmissions
    pub exhausted: usize,
}

impl FetchOutcome {
    /// Requests that ended without a stored document.
    pub fn dropped(&self) -> usize {
        self.empty + self.invalid + self.rejected + self.exhausted
    }
}

/// Download every relation in `ids` into `store`.
///
/// Workers wait `request_delay` before each request (rate limiting). A
/// request failing transiently is requeued until it succeeds or has been
/// resubmitted `max_retries` times. Only a store write failure aborts.
pub fn fetch_relations<T: Transport + ?Sized>(
    ids: &[RelationId],
    config: &Config,
    transport: &T,
    store: &RelationStore,
    pb: &ProgressBar,
) -> Result<FetchOutcome> {
    let http = http_config();
    let workers = config.workers.clamp(1, ids.len().max(1));
    log::info!(
        "Fetching {} relations with {} workers",
        ids.len(),
        workers
    );

    let queue = RetryQueue::new(
        ids.iter()
            .map(|&id| FetchRequest::new(id, config.relation_url(id))),
    );
    let (tx, rx) = mpsc::channel::<Completion>();

    thread::scope(|s| {
        for _ in 0..workers {
            let tx = tx.clone();
            let queue = &queue;
            s.spawn(move || {
                while let Some(request) = queue.next() {
                    if !http.request_delay.is_zero() {
                        thread::sleep(http.request_delay);
                    }
                    log::debug!("GET {}", request.url);
                    // A panicking transport must not leave the request in flight
                    let result = panic::catch_unwind(AssertUnwindSafe(|| {
                        transport.get(&request.url)
                    }))
                    .unwrap_or_else(|_| {
                        Err(HttpError::Invalid(format!("transport panicked on {}", request.url)))
                    });
                    if tx.send(Completion { request, result }).is_err() {
                        break;
                    }
                }
            });
        }
        drop(tx);

        let mut handler = ResponseHandler::new(store);
        let mut outcome = FetchOutcome {
            requested: ids.len(),
            ..Default::default()
        };

        for Completion {
            mut request,
            result,
        } in rx.iter()
        {
            let verdict = match handler.handle(&request, result) {
                Ok(verdict) => verdict,
                Err(e) => {
                    queue.close();
                    return Err(e);
                }
            };

            match verdict {
                Outcome::Retry if request.retries < http.max_retries => {
                    request.retries += 1;
                    outcome.retried += 1;
                    pb.set_message(format!("retry {} ({})", request.id, request.retries));
                    queue.requeue(request);
                    continue;
                }
                Outcome::Retry => {
                    log::warn!(
                        "giving up on [{}] after {} retries",
                        request.url,
                        request.retries
                    );
                    outcome.exhausted += 1;
                }
                Outcome::Dropped(DropReason::Empty) => outcome.empty += 1,
                Outcome::Dropped(DropReason::Invalid) => outcome.invalid += 1,
                Outcome::Dropped(DropReason::Rejected) => outcome.rejected += 1,
                Outcome::Indexed { code, .. } => pb.set_message(code),
            }
            queue.complete();
            pb.inc(1);
        }

        outcome.index = handler.into_index();
        Ok(outcome)
    })
}
