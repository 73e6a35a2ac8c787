//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Applying the duplicate policy at run start
//! - Loading ledger history and politeness rules per domain
//! - Seeding and draining the frontier
//! - Coordinating fetching, extraction, persistence and link discovery

use crate::config::{Config, DuplicateMode};
use crate::crawler::extractor::{extract_text, Extraction};
use crate::crawler::frontier::Frontier;
use crate::crawler::parser::extract_links;
use crate::crawler::report::{DomainReport, RunReport};
use crate::crawler::{build_http_client, fetch_url, FetchResult};
use crate::robots::{sitemap_seeds, PolitenessGate};
use crate::state::{CrawlPhase, DomainState, PageOutcome};
use crate::storage::{reset_all, CsvLedger, LedgerRecord, LedgerStore, PageStore};
use crate::url::{url_in_domain, CrawlTarget};
use crate::Result;
use reqwest::Client;
use std::collections::HashSet;

/// Main crawler coordinator structure
///
/// Owns every collaborator of a run: the HTTP client, the ledger (single
/// writer) and the page store. Domains are crawled one after another, one
/// request at a time.
pub struct Coordinator {
    config: Config,
    client: Client,
    ledger: CsvLedger,
    pages: PageStore,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// Nothing is touched on disk or on the network until `run`.
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(CrawlError)` - The HTTP client could not be built or the
    ///   ledger path is unusable
    pub fn new(config: Config) -> Result<Self> {
        let client = build_http_client(&config.user_agent, config.crawler.request_timeout())?;
        let ledger = CsvLedger::open(&config.output.ledger_path)?;
        let pages = PageStore::new(&config.output.output_dir);

        Ok(Self {
            config,
            client,
            ledger,
            pages,
        })
    }

    pub fn ledger(&self) -> &CsvLedger {
        &self.ledger
    }

    pub fn pages(&self) -> &PageStore {
        &self.pages
    }

    pub fn mode(&self) -> DuplicateMode {
        self.config.crawler.duplicate_mode
    }

    /// Crawls every configured target in order
    ///
    /// All targets are parsed before anything is deleted, so a bad target
    /// never costs the previous output. In reset mode the output directory
    /// and the ledger are then destroyed before the first domain starts.
    pub async fn run(&mut self) -> Result<RunReport> {
        let targets = self
            .config
            .targets
            .iter()
            .map(|entry| CrawlTarget::parse(&entry.base_url))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mode = self.mode();
        tracing::info!(
            "Starting crawl of {} targets (mode: {}, budget: {} pages per domain)",
            targets.len(),
            mode,
            self.config.crawler.max_pages_per_domain
        );

        if mode == DuplicateMode::Reset {
            tracing::info!("Reset mode: removing previous output and ledger");
            reset_all(&mut self.ledger, &self.pages)?;
        }

        let mut report = RunReport::new(mode);
        for target in &targets {
            tracing::info!("[start] {}", target.base_url());
            let domain_report = self.crawl_domain(target).await?;
            tracing::info!(
                "[done] {}: {} saved this run, {}/{} total, {} attempts",
                domain_report.domain,
                domain_report.saved_this_run,
                domain_report.saved_total,
                domain_report.budget,
                domain_report.attempts
            );
            report.push(domain_report);
        }

        Ok(report)
    }

    /// Crawls a single domain breadth-first
    ///
    /// # Phases
    ///
    /// 1. **Init**: load the Seen-OK set from the ledger. A met budget ends
    ///    the crawl here, before any request is made.
    /// 2. **Seeding**: load robots.txt, then seed from sitemap locations or
    ///    the root URL.
    /// 3. **Fetching**: drain the frontier until it is empty or the budget
    ///    is reached.
    ///
    /// # Returns
    ///
    /// * `Ok(DomainReport)` - The domain finished
    /// * `Err(CrawlError)` - A page or ledger row could not be written
    pub async fn crawl_domain(&mut self, target: &CrawlTarget) -> Result<DomainReport> {
        let domain = target.domain().to_string();
        let budget = self.config.crawler.max_pages_per_domain;
        let mode = self.mode();

        let (seen_ok, already_ok) = self.ledger.load_seen(&domain);
        let mut state = DomainState::new(domain.as_str(), seen_ok, budget);

        if state.budget_reached() {
            tracing::info!(
                "[skip] {} already has {} pages (>= max {})",
                domain,
                already_ok,
                budget
            );
            state.advance(CrawlPhase::Done);
            return Ok(DomainReport::from_state(&state, 0));
        }
        tracing::info!("{}: {} pages from earlier runs", domain, already_ok);

        let gate =
            PolitenessGate::load(&self.client, target, self.config.crawler.request_timeout())
                .await;

        state.advance(CrawlPhase::Seeding);
        let mut frontier = Frontier::new(domain.as_str());
        let seeds = sitemap_seeds(
            &self.client,
            gate.sitemaps(),
            &domain,
            self.config.crawler.sitemap_timeout(),
        )
        .await;

        // Seeds bypass the Seen-OK filter so a resumed skip run can reach
        // pages beyond the ones it already saved
        let seeded = if seeds.is_empty() {
            usize::from(frontier.admit(&target.root_url(), None))
        } else {
            frontier.admit_all(&seeds, None)
        };
        tracing::info!(
            "{}: seeded {} URLs from {}",
            domain,
            seeded,
            if seeds.is_empty() { "root URL" } else { "sitemaps" }
        );

        state.advance(CrawlPhase::Fetching);
        let delay = self.config.crawler.request_delay();

        while !state.budget_reached() {
            let Some(url) = frontier.pop() else {
                break;
            };

            if frontier.is_visited(&url) {
                state.record_outcome(PageOutcome::AlreadyVisited);
                continue;
            }
            if !url_in_domain(&url, &domain) {
                state.record_outcome(PageOutcome::OutOfDomain);
                continue;
            }

            frontier.mark_visited(&url);
            tracing::info!("[{}/{}] {}", frontier.visited_count(), frontier.len(), url);

            let outcome = self
                .process_url(&url, &gate, mode, &mut state, &mut frontier)
                .await?;
            tracing::debug!("{} -> {}", url, outcome);
            state.record_outcome(outcome);

            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        if state.budget_reached() {
            tracing::info!("{}: budget of {} pages reached", domain, budget);
        }
        state.advance(CrawlPhase::Done);

        Ok(DomainReport::from_state(&state, frontier.visited_count()))
    }

    /// Processes a single URL
    ///
    /// This method:
    /// 1. Checks robots.txt
    /// 2. Fetches the page
    /// 3. Records the attempt in the ledger, unless the URL is a known
    ///    page under skip mode
    /// 4. Extracts and saves the text
    /// 5. Admits discovered links to the frontier
    ///
    /// Per-page failures are outcomes, not errors. Only failing to write a
    /// page or a ledger row is returned as `Err`.
    async fn process_url(
        &mut self,
        url: &str,
        gate: &PolitenessGate,
        mode: DuplicateMode,
        state: &mut DomainState,
        frontier: &mut Frontier,
    ) -> Result<PageOutcome> {
        let already_crawled = state.is_seen_ok(url);
        let skip_save = mode == DuplicateMode::Skip && already_crawled;

        if !gate.can_fetch(url) {
            tracing::info!("{} disallowed by robots.txt", url);
            self.ledger.append(&LedgerRecord::blocked(url))?;
            return Ok(PageOutcome::BlockedByRobots);
        }

        let (final_url, status, content_type, body) = match fetch_url(&self.client, url).await {
            FetchResult::Success {
                final_url,
                status,
                content_type,
                body,
            } => (final_url, status, content_type, body),

            FetchResult::HttpError { status } => {
                tracing::warn!("{} answered HTTP {}", url, status);
                if !skip_save {
                    self.ledger.append(&LedgerRecord::attempt(url, status, ""))?;
                }
                return Ok(PageOutcome::HttpError);
            }

            FetchResult::NetworkError { error } => {
                tracing::warn!("{} failed: {}", url, error);
                if !skip_save {
                    self.ledger
                        .append(&LedgerRecord::network_error(url, &error))?;
                }
                return Ok(PageOutcome::NetworkError);
            }
        };

        let content_type = content_type.to_ascii_lowercase();
        if !content_type.contains("html") {
            tracing::debug!("{} is not HTML ({})", url, content_type);
            if !skip_save {
                self.ledger
                    .append(&LedgerRecord::non_html(url, status, &content_type))?;
            }
            return Ok(PageOutcome::NonHtml);
        }

        let outcome = match extract_text(&body, &content_type) {
            Extraction::Text(text) if !skip_save => {
                let path = self.pages.save(url, &text)?;
                let text_length = text.chars().count();
                self.ledger.append(&LedgerRecord::saved(
                    url,
                    text_length,
                    &path.to_string_lossy(),
                ))?;
                state.record_saved(url, already_crawled);
                tracing::info!("Saved {} chars ({}/{})", text_length, state.saved(), state.budget());
                PageOutcome::Saved
            }
            Extraction::Text(_) => PageOutcome::KeptPrevious,
            Extraction::Empty => PageOutcome::EmptyText,
        };

        let links = extract_links(&body, &final_url);
        let admitted = frontier.admit_all(&links, skip_set(mode, state));
        tracing::debug!(
            "{}: {} links found, {} admitted, {} queued",
            url,
            links.len(),
            admitted,
            frontier.len()
        );

        Ok(outcome)
    }
}

/// The set frontier admission excludes, present only in skip mode
fn skip_set(mode: DuplicateMode, state: &DomainState) -> Option<&HashSet<String>> {
    (mode == DuplicateMode::Skip).then(|| state.seen_ok())
}
