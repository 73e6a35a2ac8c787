//! Output module for crawl summaries and exports
//!
//! This module handles:
//! - Printing the summary of a finished run
//! - Computing statistics over the ledger
//! - Exporting the embeddable record set for the indexing step

mod export;
pub mod stats;
mod summary;

pub use export::export_index;
pub use stats::{load_statistics, print_statistics, LedgerStatistics};
pub use summary::{format_run_summary, print_run_summary};
