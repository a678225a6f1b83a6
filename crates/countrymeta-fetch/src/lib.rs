//! Countrymeta Fetch - relation discovery and download
//!
//! Discovers country boundary relations through the Overpass API and
//! downloads each relation from the OSM API v0.6 into the Relation Store.
//!
//! # Features
//!
//! - One Overpass query seeds the id list, plus configured supplementary ids
//! - Bounded worker pool over a retry queue; failed requests are requeued
//! - A single consumer classifies completions and owns the relation index
//!
//! # Example
//!
//! ```ignore
//! use countrymeta_core::{ProgressContext, ReqwestTransport};
//! use countrymeta_fetch::{Config, run};
//! use countrymeta_store::RelationStore;
//!
//! let store = RelationStore::open(".build".as_ref())?;
//! let summary = run(&Config::default(), &ReqwestTransport, &store, &ProgressContext::new())?;
//! println!("Indexed {} countries", summary.outcome.index.len());
//! ```

pub mod config;
pub mod discovery;
pub mod fetcher;
pub mod handler;
pub mod runner;

// Re-exports
pub use config::Config;
pub use discovery::discover_relation_ids;
pub use fetcher::{FetchOutcome, FetchRequest, fetch_relations};
pub use handler::{DropReason, Outcome, ResponseHandler};
pub use runner::{FetchSummary, run};
