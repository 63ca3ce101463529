//! Pipeline entry points for crawler operations.
//!
//! - `run_crawler`: Crawl every result page and checkpoint listing records
//! - `run_chunked`: Barrier-separated bounded-concurrency scheduling
//! - `RecordSink`: Record filtering and per-page checkpoints

pub mod crawl;
pub mod scheduler;
pub mod sink;

pub use crawl::{CrawlSummary, PaginationDriver, Termination, run_crawler};
pub use scheduler::{chunk_sizes, run_chunked};
pub use sink::RecordSink;
