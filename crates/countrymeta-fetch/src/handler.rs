//! Classification of relation responses
//!
//! Runs on the single consumer thread, one completion at a time, so the
//! relation index needs no locking.

use anyhow::Result;
use countrymeta_core::{HttpError, HttpResponse};
use countrymeta_store::{RawRelationDocument, RelationId, RelationIndex, RelationStore};

use crate::fetcher::FetchRequest;

/// Why a request was dropped for good.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// 200 with an empty body: the id has no data
    Empty,
    /// Undecodable body, no relation id, or no alpha-3 code
    Invalid,
    /// The transport refused the request outright
    Rejected,
}

/// Verdict for one completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Stored and indexed
    Indexed { code: String, id: RelationId },
    /// Transient failure, resubmit the same request
    Retry,
    /// Terminal failure, excluded from the index
    Dropped(DropReason),
}

/// Consumes completions, persists good documents and builds the index.
pub struct ResponseHandler<'a> {
    store: &'a RelationStore,
    index: RelationIndex,
}

impl<'a> ResponseHandler<'a> {
    pub fn new(store: &'a RelationStore) -> Self {
        Self {
            store,
            index: RelationIndex::new(),
        }
    }

    /// Classify one completion.
    ///
    /// Only a failure to write the store is an error; every network anomaly
    /// maps to an [`Outcome`].
    pub fn handle(
        &mut self,
        request: &FetchRequest,
        result: Result<HttpResponse, HttpError>,
    ) -> Result<Outcome> {
        let response = match result {
            Err(e) if !e.is_retryable() => {
                log::warn!("request rejected [{}]: {e}", request.url);
                return Ok(Outcome::Dropped(DropReason::Rejected));
            }
            Err(e) => {
                log::warn!("response error [{}] ({e}, returned to queue)", request.url);
                return Ok(Outcome::Retry);
            }
            Ok(response) => response,
        };

        if !response.is_ok() {
            log::warn!(
                "response error [{}] (HTTP {}, returned to queue)",
                request.url,
                response.status
            );
            return Ok(Outcome::Retry);
        }

        if response.body.is_empty() {
            log::warn!("empty response [{}]", request.url);
            return Ok(Outcome::Dropped(DropReason::Empty));
        }

        let document = match RawRelationDocument::from_slice(&response.body) {
            Ok(document) => document,
            Err(e) => {
                log::warn!("invalid response [{}]: {e}", request.url);
                return Ok(Outcome::Dropped(DropReason::Invalid));
            }
        };

        let (Some(id), Some(code)) = (document.relation_id(), document.alpha3()) else {
            log::warn!("invalid response [{}]", request.url);
            return Ok(Outcome::Dropped(DropReason::Invalid));
        };

        self.store.put(id, &response.body)?;
        log::info!("received data for ID {id}");

        if let Some(previous) = self.index.insert(code.clone(), id) {
            log::warn!("{code}: relation {previous} replaced by {id}");
        }
        Ok(Outcome::Indexed { code, id })
    }

    pub fn index(&self) -> &RelationIndex {
        &self.index
    }

    /// Finished index, sorted by code.
    pub fn into_index(self) -> RelationIndex {
        self.index
    }
}
