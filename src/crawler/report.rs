//! Crawl reports
//!
//! A `DomainReport` is produced when a domain crawl finishes; `RunReport`
//! collects them for a whole run.

use crate::config::DuplicateMode;
use crate::state::{CrawlPhase, DomainState, PageOutcome};
use std::collections::BTreeMap;

/// Summary of one domain crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainReport {
    pub domain: String,
    /// Last phase reached
    pub phase: CrawlPhase,
    /// Pages counted toward the budget by this run
    pub saved_this_run: usize,
    /// Pages counted toward the budget in total, earlier runs included
    pub saved_total: usize,
    pub budget: usize,
    /// URLs that went through the politeness check
    pub attempts: usize,
    pub outcomes: BTreeMap<PageOutcome, usize>,
}

impl DomainReport {
    pub fn from_state(state: &DomainState, attempts: usize) -> Self {
        Self {
            domain: state.domain().to_string(),
            phase: state.phase(),
            saved_this_run: state.saved_this_run(),
            saved_total: state.saved(),
            budget: state.budget(),
            attempts,
            outcomes: state.outcomes().clone(),
        }
    }

    /// True when the domain was skipped because earlier runs met its budget
    pub fn skipped_at_init(&self) -> bool {
        self.phase == CrawlPhase::Done && self.attempts == 0 && self.outcomes.is_empty()
    }

    pub fn outcome_count(&self, outcome: PageOutcome) -> usize {
        self.outcomes.get(&outcome).copied().unwrap_or(0)
    }
}

/// Summary of a whole run over every configured target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub mode: DuplicateMode,
    pub domains: Vec<DomainReport>,
}

impl RunReport {
    pub fn new(mode: DuplicateMode) -> Self {
        Self {
            mode,
            domains: Vec::new(),
        }
    }

    pub fn push(&mut self, report: DomainReport) {
        self.domains.push(report);
    }

    pub fn total_saved(&self) -> usize {
        self.domains.iter().map(|d| d.saved_this_run).sum()
    }

    pub fn total_attempts(&self) -> usize {
        self.domains.iter().map(|d| d.attempts).sum()
    }

    /// Outcome counts summed over all domains
    pub fn outcomes(&self) -> BTreeMap<PageOutcome, usize> {
        let mut totals = BTreeMap::new();
        for report in &self.domains {
            for (outcome, count) in &report.outcomes {
                *totals.entry(*outcome).or_insert(0) += count;
            }
        }
        totals
    }
}
