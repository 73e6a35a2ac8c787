use crate::state::PageOutcome;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Lifecycle of a single domain crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Loading politeness rules and ledger history
    Init,
    /// Filling the frontier from sitemaps or the root URL
    Seeding,
    /// Main fetch loop
    Fetching,
    /// Frontier exhausted or budget reached
    Done,
}

impl CrawlPhase {
    /// Returns true if `next` is a legal successor of this phase
    ///
    /// `Init -> Done` is the fast resume path taken when the budget is
    /// already met by earlier runs.
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        matches!(
            (self, next),
            (Self::Init, Self::Seeding)
                | (Self::Init, Self::Done)
                | (Self::Seeding, Self::Fetching)
                | (Self::Fetching, Self::Done)
        )
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::Seeding => "seeding",
            Self::Fetching => "fetching",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Tracks the state of one domain during a crawl
///
/// Holds the Seen-OK set loaded from the ledger, the saved-page counter the
/// budget is checked against, and per-outcome counts for reporting. Lives for
/// one domain crawl and is then turned into a report.
#[derive(Debug, Clone)]
pub struct DomainState {
    domain: String,
    phase: CrawlPhase,
    seen_ok: HashSet<String>,
    saved: usize,
    saved_this_run: usize,
    budget: usize,
    outcomes: BTreeMap<PageOutcome, usize>,
}

impl DomainState {
    /// Creates the state for a domain from its ledger history
    ///
    /// # Arguments
    ///
    /// * `domain` - Normalized domain
    /// * `seen_ok` - URLs with a status-200 ledger row for this domain
    /// * `budget` - Maximum number of saved pages for the domain
    pub fn new(domain: impl Into<String>, seen_ok: HashSet<String>, budget: usize) -> Self {
        let saved = seen_ok.len();
        Self {
            domain: domain.into(),
            phase: CrawlPhase::Init,
            seen_ok,
            saved,
            saved_this_run: 0,
            budget,
            outcomes: BTreeMap::new(),
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    /// Moves to the next phase
    ///
    /// # Returns
    ///
    /// * `true` - The transition was legal and applied
    /// * `false` - The transition was rejected; the phase is unchanged
    pub fn advance(&mut self, next: CrawlPhase) -> bool {
        if !self.phase.can_transition_to(next) {
            tracing::warn!(
                "Rejected phase transition {} -> {} for {}",
                self.phase,
                next,
                self.domain
            );
            return false;
        }
        tracing::debug!("{}: {} -> {}", self.domain, self.phase, next);
        self.phase = next;
        true
    }

    /// Checks if a URL already has a successful ledger row
    pub fn is_seen_ok(&self, url: &str) -> bool {
        self.seen_ok.contains(url)
    }

    pub fn seen_ok(&self) -> &HashSet<String> {
        &self.seen_ok
    }

    /// Checks if the domain has reached its page budget
    pub fn budget_reached(&self) -> bool {
        self.saved >= self.budget
    }

    /// Saved pages counted toward the budget, including earlier runs
    pub fn saved(&self) -> usize {
        self.saved
    }

    /// Pages counted toward the budget by this run
    pub fn saved_this_run(&self) -> usize {
        self.saved_this_run
    }

    pub fn budget(&self) -> usize {
        self.budget
    }

    /// Records a successful save
    ///
    /// The URL joins the Seen-OK set. The budget counter only moves when
    /// the URL was not already known, so refreshing a page under overwrite
    /// mode does not inflate the count.
    pub fn record_saved(&mut self, url: &str, already_crawled: bool) {
        self.seen_ok.insert(url.to_string());
        if !already_crawled {
            self.saved += 1;
            self.saved_this_run += 1;
        }
    }

    /// Tallies the outcome of one popped URL
    pub fn record_outcome(&mut self, outcome: PageOutcome) {
        *self.outcomes.entry(outcome).or_insert(0) += 1;
    }

    pub fn outcomes(&self) -> &BTreeMap<PageOutcome, usize> {
        &self.outcomes
    }

    /// Count for a single outcome
    pub fn outcome_count(&self, outcome: PageOutcome) -> usize {
        self.outcomes.get(&outcome).copied().unwrap_or(0)
    }
}
