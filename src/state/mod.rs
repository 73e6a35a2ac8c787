//! State module for tracking crawl progress
//!
//! This module provides state management for pages and domains during the crawl process.
//!
//! # Components
//!
//! - `PageOutcome`: What happened to each URL taken off the frontier
//! - `DomainState`: Per-domain Seen-OK set, budget accounting, and phase
//! - `CrawlPhase`: The `Init -> Seeding -> Fetching -> Done` lifecycle

mod domain_state;
mod page_state;

// Re-export main types
pub use domain_state::{CrawlPhase, DomainState};
pub use page_state::PageOutcome;
