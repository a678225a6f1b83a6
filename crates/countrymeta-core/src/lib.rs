//! Countrymeta Core - Common infrastructure for the country metadata builder
//!
//! This crate provides the blocking HTTP transport, the retry work queue
//! shared by the fetch workers, and the logging/progress/file helpers used
//! by every stage.

pub mod fs;
pub mod http;
pub mod logging;
pub mod progress;
pub mod queue;

// Re-exports for convenience
pub use fs::{cleanup_tmp_files, write_atomic};
pub use http::{
    HttpConfig, HttpError, HttpResponse, ReqwestTransport, SHARED_RUNTIME, Transport,
    http_client, http_config, set_http_config,
};
pub use logging::{IndicatifLogger, init_logging};
pub use progress::{ProgressContext, SharedProgress};
pub use queue::RetryQueue;
