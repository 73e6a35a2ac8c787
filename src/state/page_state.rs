/// Page outcome definitions for tracking crawl progress
///
/// Every URL popped from the frontier ends in exactly one of these outcomes.
use std::fmt;

/// What happened to a single URL taken off the frontier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PageOutcome {
    // ===== Success =====
    /// Text extracted, page file written, ledger row appended
    Saved,

    // ===== Skips (no ledger row) =====
    /// Already processed earlier in this run
    AlreadyVisited,

    /// Host no longer belongs to the crawl domain
    OutOfDomain,

    /// Fetched for link discovery only; already saved by an earlier run
    KeptPrevious,

    /// HTML page with no extractable text
    EmptyText,

    // ===== Rejections =====
    /// Disallowed by robots.txt; never requested
    BlockedByRobots,

    /// Timeout, connection failure, DNS error, or body read failure
    NetworkError,

    /// Server answered with a status other than 200
    HttpError,

    /// Content-Type did not mention html
    NonHtml,
}

impl PageOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Saved => "saved",
            Self::AlreadyVisited => "already_visited",
            Self::OutOfDomain => "out_of_domain",
            Self::KeptPrevious => "kept_previous",
            Self::EmptyText => "empty_text",
            Self::BlockedByRobots => "blocked_by_robots",
            Self::NetworkError => "network_error",
            Self::HttpError => "http_error",
            Self::NonHtml => "non_html",
        }
    }
}

impl fmt::Display for PageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
