//! Breadth-first crawl frontier
//!
//! This module handles:
//! - FIFO ordering of discovered URLs
//! - Admission: domain scoping and once-per-run dedup
//! - The run-scoped `visited` set

use crate::url::url_in_domain;
use std::collections::{HashSet, VecDeque};

/// Why a URL was refused admission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Host is not the domain or one of its subdomains
    OutOfDomain,
    /// Already pushed during this run
    AlreadyQueued,
    /// Already processed during this run
    AlreadyVisited,
    /// Has a successful ledger row and the run skips those
    SeenOk,
}

/// The frontier of one domain crawl
///
/// `queued` remembers every URL ever pushed, so a URL enters the queue at
/// most once per run even after it has been popped.
#[derive(Debug, Clone)]
pub struct Frontier {
    domain: String,
    queue: VecDeque<String>,
    queued: HashSet<String>,
    visited: HashSet<String>,
}

impl Frontier {
    /// Creates an empty frontier scoped to a normalized domain
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            queue: VecDeque::new(),
            queued: HashSet::new(),
            visited: HashSet::new(),
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Decides whether a URL may enter the queue
    ///
    /// # Arguments
    ///
    /// * `url` - Absolute URL with its fragment already stripped
    /// * `skip` - Seen-OK set to exclude, passed only in skip mode
    pub fn check(&self, url: &str, skip: Option<&HashSet<String>>) -> Result<(), Rejection> {
        if !url_in_domain(url, &self.domain) {
            return Err(Rejection::OutOfDomain);
        }
        if self.visited.contains(url) {
            return Err(Rejection::AlreadyVisited);
        }
        if self.queued.contains(url) {
            return Err(Rejection::AlreadyQueued);
        }
        if skip.map(|seen| seen.contains(url)).unwrap_or(false) {
            return Err(Rejection::SeenOk);
        }
        Ok(())
    }

    /// Pushes a URL to the back of the queue if it passes admission
    ///
    /// # Returns
    ///
    /// * `true` - The URL was enqueued
    /// * `false` - The URL was rejected
    pub fn admit(&mut self, url: &str, skip: Option<&HashSet<String>>) -> bool {
        match self.check(url, skip) {
            Ok(()) => {
                self.queued.insert(url.to_string());
                self.queue.push_back(url.to_string());
                true
            }
            Err(reason) => {
                tracing::trace!("Not admitting {}: {:?}", url, reason);
                false
            }
        }
    }

    /// Admits each URL in order
    ///
    /// # Returns
    ///
    /// The number of URLs enqueued
    pub fn admit_all<I, S>(&mut self, urls: I, skip: Option<&HashSet<String>>) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        urls.into_iter()
            .filter(|url| self.admit(url.as_ref(), skip))
            .count()
    }

    /// Takes the oldest URL off the queue
    pub fn pop(&mut self) -> Option<String> {
        self.queue.pop_front()
    }

    pub fn mark_visited(&mut self, url: &str) {
        self.visited.insert(url.to_string());
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// URLs still waiting in the queue
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
