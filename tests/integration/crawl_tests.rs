//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end, including resume behavior across runs.

use ledger_crawl::config::{
    Config, CrawlerConfig, DuplicateMode, OutputConfig, TargetEntry, UserAgentConfig,
};
use ledger_crawl::crawler::Coordinator;
use ledger_crawl::state::PageOutcome;
use ledger_crawl::storage::{read_saved_page, CsvLedger, LedgerRecord, LedgerStore};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration crawling a single base URL
fn create_test_config(base_url: &str, dir: &Path, mode: DuplicateMode) -> Config {
    Config {
        crawler: CrawlerConfig {
            max_pages_per_domain: 50,
            request_delay_ms: 0,
            request_timeout_secs: 5,
            sitemap_timeout_secs: 5,
            duplicate_mode: mode,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact: "test@example.com".to_string(),
        },
        output: OutputConfig {
            output_dir: dir.join("data"),
            ledger_path: dir.join("crawl_log.csv"),
        },
        targets: vec![TargetEntry {
            base_url: base_url.to_string(),
        }],
    }
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><body>{}</body></html>", body),
        "text/html; charset=utf-8",
    )
}

async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .mount(server)
        .await;
}

async fn mount_never(server: &MockServer, route: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html("should not be fetched"))
        .expect(0)
        .mount(server)
        .await;
}

fn ledger_rows(config: &Config) -> Vec<LedgerRecord> {
    CsvLedger::open(&config.output.ledger_path)
        .unwrap()
        .load_records()
        .unwrap()
}

fn row_for<'a>(rows: &'a [LedgerRecord], url: &str) -> &'a LedgerRecord {
    rows.iter()
        .find(|r| r.url == url)
        .unwrap_or_else(|| panic!("no ledger row for {}", url))
}

/// Paths of every request the server received, robots.txt excluded
async fn page_requests(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .map(|r| r.url.path().to_string())
        .filter(|p| p != "/robots.txt")
        .collect()
}

#[tokio::test]
async fn test_full_crawl_single_domain() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        r#"<h1>Home</h1><a href="/page1">One</a><a href="/page2#top">Two</a>
           <a href="https://other.org/x">Elsewhere</a><a href="mailto:a@b.c">Mail</a>"#,
    )
    .await;
    mount_page(&server, "/page1", r#"Content   one <a href="/">Home</a>"#).await;
    mount_page(&server, "/page2", "<script>track()</script>Content two").await;

    let config = create_test_config(&base, dir.path(), DuplicateMode::Reset);
    let mut coordinator = Coordinator::new(config.clone()).unwrap();
    let report = coordinator.run().await.unwrap();

    let domain = &report.domains[0];
    assert_eq!(domain.saved_this_run, 3);
    assert_eq!(domain.attempts, 3);
    assert_eq!(domain.outcome_count(PageOutcome::Saved), 3);

    let rows = ledger_rows(&config);
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| r.status == 200));

    // FIFO order: root first, then its links in document order
    assert_eq!(rows[0].url, format!("{}/", base));
    assert_eq!(rows[1].url, format!("{}/page1", base));
    assert_eq!(rows[2].url, format!("{}/page2", base));

    let page2 = row_for(&rows, &format!("{}/page2", base));
    let saved = read_saved_page(Path::new(&page2.file_path)).unwrap();
    assert_eq!(saved.url, format!("{}/page2", base));
    assert_eq!(saved.text, "Content two");
    assert_eq!(page2.text_length, "Content two".chars().count());

    let page1 = row_for(&rows, &format!("{}/page1", base));
    let saved = read_saved_page(Path::new(&page1.file_path)).unwrap();
    assert_eq!(saved.text, "Content one Home");

    let files = fs::read_dir(dir.path().join("data")).unwrap().count();
    assert_eq!(files, 3);
}

#[tokio::test]
async fn test_robots_disallowed_url_is_recorded_but_never_fetched() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private"),
        )
        .mount(&server)
        .await;
    mount_page(
        &server,
        "/",
        r#"Home <a href="/private/secret">Secret</a><a href="/open">Open</a>"#,
    )
    .await;
    mount_page(&server, "/open", "Open page").await;
    mount_never(&server, "/private/secret").await;

    let config = create_test_config(&base, dir.path(), DuplicateMode::Reset);
    let report = Coordinator::new(config.clone())
        .unwrap()
        .run()
        .await
        .unwrap();

    let rows = ledger_rows(&config);
    let blocked = row_for(&rows, &format!("{}/private/secret", base));
    assert_eq!(blocked.status, 0);
    assert_eq!(blocked.note, "blocked_by_robots");
    assert!(blocked.file_path.is_empty());

    assert_eq!(
        report.domains[0].outcome_count(PageOutcome::BlockedByRobots),
        1
    );
    assert_eq!(report.domains[0].saved_this_run, 2);
}

#[tokio::test]
async fn test_non_html_and_error_responses() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        r#"Home <a href="/doc.pdf">PDF</a><a href="/gone">Gone</a><a href="/blank">Blank</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/doc.pdf"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(b"%PDF-1.4".to_vec(), "Application/PDF"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    mount_page(&server, "/blank", "<script>only()</script>   ").await;

    let config = create_test_config(&base, dir.path(), DuplicateMode::Reset);
    let report = Coordinator::new(config.clone())
        .unwrap()
        .run()
        .await
        .unwrap();

    let rows = ledger_rows(&config);
    let pdf = row_for(&rows, &format!("{}/doc.pdf", base));
    assert_eq!(pdf.status, 200);
    assert_eq!(pdf.note, "non_html:application/pdf");
    assert!(pdf.file_path.is_empty());

    let gone = row_for(&rows, &format!("{}/gone", base));
    assert_eq!(gone.status, 404);
    assert!(gone.note.is_empty());

    // Empty pages leave no row
    assert!(!rows.iter().any(|r| r.url == format!("{}/blank", base)));

    let domain = &report.domains[0];
    assert_eq!(domain.outcome_count(PageOutcome::NonHtml), 1);
    assert_eq!(domain.outcome_count(PageOutcome::HttpError), 1);
    assert_eq!(domain.outcome_count(PageOutcome::EmptyText), 1);
    assert_eq!(domain.saved_this_run, 1);
}

#[tokio::test]
async fn test_timeout_records_one_row_and_crawl_continues() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        r#"Home <a href="/slow">Slow</a><a href="/after">After</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html("late").set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;
    mount_page(&server, "/after", "After the timeout").await;

    let mut config = create_test_config(&base, dir.path(), DuplicateMode::Reset);
    config.crawler.request_timeout_secs = 1;

    let report = Coordinator::new(config.clone())
        .unwrap()
        .run()
        .await
        .unwrap();

    let rows = ledger_rows(&config);
    let slow_rows: Vec<_> = rows
        .iter()
        .filter(|r| r.url == format!("{}/slow", base))
        .collect();
    assert_eq!(slow_rows.len(), 1);
    assert_eq!(slow_rows[0].status, 0);
    assert!(!slow_rows[0].note.is_empty());

    let after = row_for(&rows, &format!("{}/after", base));
    assert_eq!(after.status, 200);
    assert_eq!(report.domains[0].outcome_count(PageOutcome::NetworkError), 1);
}

#[tokio::test]
async fn test_skip_mode_second_run_never_requests_known_links() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = TempDir::new().unwrap();

    mount_page(&server, "/", r#"Home <a href="/page1">One</a>"#).await;
    mount_page(&server, "/page1", r#"One <a href="/">Home</a>"#).await;

    let config = create_test_config(&base, dir.path(), DuplicateMode::Skip);
    let first = Coordinator::new(config.clone())
        .unwrap()
        .run()
        .await
        .unwrap();
    assert_eq!(first.domains[0].saved_this_run, 2);
    assert_eq!(ledger_rows(&config).len(), 2);

    // Forget the first run's requests. The root is still fetched to discover
    // links, but known pages reached through links are never requested.
    server.reset().await;
    mount_page(&server, "/", r#"Home <a href="/page1">One</a>"#).await;
    mount_never(&server, "/page1").await;

    let second = Coordinator::new(config.clone())
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(page_requests(&server).await, vec!["/"]);
    assert_eq!(
        second.domains[0].outcome_count(PageOutcome::KeptPrevious),
        1
    );
    assert_eq!(second.domains[0].saved_this_run, 0);
    assert_eq!(second.domains[0].saved_total, 2);
    assert_eq!(ledger_rows(&config).len(), 2);
}

#[tokio::test]
async fn test_reset_mode_clears_previous_output() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = TempDir::new().unwrap();

    let config = create_test_config(&base, dir.path(), DuplicateMode::Reset);

    // Leftovers from an earlier run
    fs::create_dir_all(&config.output.output_dir).unwrap();
    fs::write(config.output.output_dir.join("stale.txt"), "URL: x\n\nold\n").unwrap();
    let mut ledger = CsvLedger::open(&config.output.ledger_path).unwrap();
    ledger
        .append(&LedgerRecord::saved("https://stale.example/", 3, "stale.txt"))
        .unwrap();

    mount_page(&server, "/", "Fresh content").await;

    Coordinator::new(config.clone())
        .unwrap()
        .run()
        .await
        .unwrap();

    assert!(!config.output.output_dir.join("stale.txt").exists());
    let rows = ledger_rows(&config);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].url, format!("{}/", base));

    let files: Vec<_> = fs::read_dir(&config.output.output_dir).unwrap().collect();
    assert_eq!(files.len(), 1);
}

#[tokio::test]
async fn test_budget_met_makes_no_requests() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = TempDir::new().unwrap();

    let mut config = create_test_config(&base, dir.path(), DuplicateMode::Overwrite);
    config.crawler.max_pages_per_domain = 2;

    let mut ledger = CsvLedger::open(&config.output.ledger_path).unwrap();
    for route in ["/", "/a"] {
        ledger
            .append(&LedgerRecord::saved(&format!("{}{}", base, route), 5, "x.txt"))
            .unwrap();
    }

    mount_never(&server, "/").await;

    let report = Coordinator::new(config.clone())
        .unwrap()
        .run()
        .await
        .unwrap();

    let received = server.received_requests().await.unwrap_or_default();
    assert!(received.is_empty(), "unexpected requests: {:?}", received);
    assert!(report.domains[0].skipped_at_init());
    assert_eq!(ledger_rows(&config).len(), 2);
}

#[tokio::test]
async fn test_overwrite_twice_counts_once() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = TempDir::new().unwrap();

    mount_page(&server, "/", "Only page").await;

    let config = create_test_config(&base, dir.path(), DuplicateMode::Overwrite);

    let first = Coordinator::new(config.clone())
        .unwrap()
        .run()
        .await
        .unwrap();
    let second = Coordinator::new(config.clone())
        .unwrap()
        .run()
        .await
        .unwrap();

    let rows = ledger_rows(&config);
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.status == 200 && r.url == format!("{}/", base)));

    assert_eq!(first.domains[0].saved_this_run, 1);
    assert_eq!(second.domains[0].saved_this_run, 0);
    assert_eq!(second.domains[0].saved_total, 1);
    assert_eq!(second.domains[0].outcome_count(PageOutcome::Saved), 1);

    // Same URL, same file
    assert_eq!(fs::read_dir(&config.output.output_dir).unwrap().count(), 1);
}

#[tokio::test]
async fn test_budget_stops_crawl() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        r#"Home <a href="/a">A</a><a href="/b">B</a><a href="/c">C</a>"#,
    )
    .await;
    mount_page(&server, "/a", "Page A").await;
    mount_never(&server, "/b").await;
    mount_never(&server, "/c").await;

    let mut config = create_test_config(&base, dir.path(), DuplicateMode::Reset);
    config.crawler.max_pages_per_domain = 2;

    let report = Coordinator::new(config.clone())
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(report.domains[0].saved_this_run, 2);
    assert_eq!(ledger_rows(&config).len(), 2);
}

#[tokio::test]
async fn test_sitemap_seeds_replace_root() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(format!("User-agent: *\nAllow: /\nSitemap: {}/sitemap.xml\n", base)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>{0}/courses</loc></url>
  <url><loc>https://other.org/outside</loc></url>
  <url><loc>{0}/staff</loc></url>
</urlset>"#,
            base
        )))
        .mount(&server)
        .await;
    mount_page(&server, "/courses", "Courses").await;
    mount_page(&server, "/staff", "Staff").await;
    mount_never(&server, "/").await;

    let config = create_test_config(&base, dir.path(), DuplicateMode::Reset);
    let report = Coordinator::new(config.clone())
        .unwrap()
        .run()
        .await
        .unwrap();

    let rows = ledger_rows(&config);
    let urls: Vec<&str> = rows.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![format!("{}/courses", base), format!("{}/staff", base)]
    );
    assert_eq!(report.domains[0].saved_this_run, 2);
}

#[tokio::test]
async fn test_resume_in_overwrite_mode_continues_budget() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = TempDir::new().unwrap();

    mount_page(&server, "/", r#"Home <a href="/a">A</a><a href="/b">B</a>"#).await;
    mount_page(&server, "/a", "Page A").await;
    mount_page(&server, "/b", "Page B").await;

    let mut config = create_test_config(&base, dir.path(), DuplicateMode::Overwrite);
    config.crawler.max_pages_per_domain = 2;

    let first = Coordinator::new(config.clone())
        .unwrap()
        .run()
        .await
        .unwrap();
    assert_eq!(first.domains[0].saved_total, 2);

    // Raising the budget lets a later run pick up where the first stopped
    config.crawler.max_pages_per_domain = 3;
    let second = Coordinator::new(config.clone())
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(second.domains[0].saved_this_run, 1);
    assert_eq!(second.domains[0].saved_total, 3);
    let rows = ledger_rows(&config);
    assert!(rows.iter().any(|r| r.url == format!("{}/b", base)));
}

#[tokio::test]
async fn test_skip_mode_resumes_after_budget_cutoff() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = TempDir::new().unwrap();

    mount_page(&server, "/", r#"Home <a href="/a">A</a><a href="/b">B</a>"#).await;
    mount_page(&server, "/a", "Page A").await;
    mount_page(&server, "/b", "Page B").await;

    let mut config = create_test_config(&base, dir.path(), DuplicateMode::Skip);
    config.crawler.max_pages_per_domain = 2;

    let first = Coordinator::new(config.clone())
        .unwrap()
        .run()
        .await
        .unwrap();
    assert_eq!(first.domains[0].saved_this_run, 2);

    server.reset().await;
    mount_page(&server, "/", r#"Home <a href="/a">A</a><a href="/b">B</a>"#).await;
    mount_never(&server, "/a").await;
    mount_page(&server, "/b", "Page B").await;

    config.crawler.max_pages_per_domain = 3;
    let second = Coordinator::new(config.clone())
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(second.domains[0].saved_this_run, 1);
    assert_eq!(second.domains[0].saved_total, 3);
    assert_eq!(page_requests(&server).await, vec!["/", "/b"]);

    // The known root was fetched for its links only; no new row for it
    let rows = ledger_rows(&config);
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().any(|r| r.url == format!("{}/b", base)));
    assert_eq!(
        rows.iter().filter(|r| r.url == format!("{}/", base)).count(),
        1
    );
}

#[tokio::test]
async fn test_sitemap_root_and_linked_root_are_one_page() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(format!("User-agent: *\nSitemap: {}/sitemap.xml\n", base)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "<urlset><url><loc>{}</loc></url></urlset>",
            base
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(r#"Home <a href="/">Home again</a>"#))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&base, dir.path(), DuplicateMode::Reset);
    let report = Coordinator::new(config.clone())
        .unwrap()
        .run()
        .await
        .unwrap();

    let rows = ledger_rows(&config);
    let urls: Vec<&str> = rows.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(urls, vec![format!("{}/", base)]);
    assert_eq!(report.domains[0].saved_this_run, 1);
    assert_eq!(report.domains[0].attempts, 1);
}
