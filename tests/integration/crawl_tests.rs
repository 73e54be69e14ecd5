//! Integration tests for the crawler
//!
//! The wiremock tests exercise the full crawl cycle over HTTP, both through
//! the proxy template and directly. The fixture tests swap in an in-memory
//! fetcher to check dedup, depth, termination, concurrency and cancellation
//! on synthetic sites.

use linkscope::analysis::HtmlAnalyzer;
use linkscope::config::parse_config;
use linkscope::crawler::{CrawlStatus, Coordinator, FetchRoute, FetchedPage, Fetcher};
use linkscope::{crawl, CrawlConfig, CrawlOutcome, FetchError, NormalizedUrl};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SEED: &str = "https://x.test/";
const NO_LINKS: &[&str] = &[];

fn url(path: &str) -> NormalizedUrl {
    NormalizedUrl::parse(&format!("https://x.test{}", path)).unwrap()
}

fn html_with_links(links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|l| format!(r#"<a href="{}">{}</a>"#, l, l))
        .collect();
    format!("<html><head><title>Page</title></head><body>{}</body></html>", anchors)
}

/// Creates a crawl configuration for the synthetic site
fn create_test_config(max_depth: u32, concurrency: usize) -> CrawlConfig {
    CrawlConfig::new(SEED)
        .unwrap()
        .with_max_depth(max_depth)
        .with_concurrency(concurrency)
        .with_crawl_delay(Duration::ZERO)
}

/// In-memory site keyed by path
///
/// Paths missing from the map answer 404. Records how often each URL was
/// fetched and the peak number of concurrent fetches.
struct FixtureFetcher {
    pages: HashMap<String, Vec<String>>,
    latency: Duration,
    fetch_counts: Mutex<HashMap<String, usize>>,
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl FixtureFetcher {
    fn new(site: &[(&str, &[&str])]) -> Self {
        Self {
            pages: site
                .iter()
                .map(|(path, links)| {
                    (
                        path.to_string(),
                        links.iter().map(|l| l.to_string()).collect(),
                    )
                })
                .collect(),
            latency: Duration::from_millis(1),
            fetch_counts: Mutex::new(HashMap::new()),
            current: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    /// A linear chain `/` -> `/1` -> `/2` -> ... -> `/{len - 1}`
    fn chain(len: usize) -> Self {
        let paths: Vec<String> = (0..len)
            .map(|i| if i == 0 { "/".to_string() } else { format!("/{}", i) })
            .collect();
        let mut fetcher = Self::new(&[]);
        for (i, path) in paths.iter().enumerate() {
            let links = paths.get(i + 1).cloned().into_iter().collect();
            fetcher.pages.insert(path.clone(), links);
        }
        fetcher
    }

    fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

impl Fetcher for FixtureFetcher {
    async fn fetch(&self, target: &Url) -> Result<FetchedPage, FetchError> {
        *self
            .fetch_counts
            .lock()
            .unwrap()
            .entry(target.to_string())
            .or_insert(0) += 1;

        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.latency).await;
        self.current.fetch_sub(1, Ordering::SeqCst);

        match self.pages.get(target.path()) {
            Some(links) => {
                let links: Vec<&str> = links.iter().map(String::as_str).collect();
                Ok(FetchedPage {
                    final_url: target.clone(),
                    status: 200,
                    body: html_with_links(&links),
                    elapsed: self.latency,
                })
            }
            None => Err(FetchError::Status { status: 404 }),
        }
    }
}

async fn run_fixture(config: CrawlConfig, fetcher: &Arc<FixtureFetcher>) -> CrawlOutcome {
    Coordinator::with_collaborators(config, Arc::clone(fetcher), HtmlAnalyzer)
        .run()
        .await
}

fn assert_at_most_once(outcome: &CrawlOutcome, fetcher: &FixtureFetcher) {
    let mut seen = HashSet::new();
    for page in &outcome.pages {
        assert!(seen.insert(page.url.clone()), "duplicate page {}", page.url);
    }
    for failed in &outcome.failed_urls {
        assert!(seen.insert(failed.url.clone()), "duplicate failure {}", failed.url);
    }
    for (target, count) in fetcher.fetch_counts.lock().unwrap().iter() {
        assert_eq!(*count, 1, "{} fetched {} times", target, count);
    }
}

#[tokio::test]
async fn test_end_to_end_through_proxy() {
    let mock_server = MockServer::start().await;

    let pages: [(&str, u16, String); 4] = [
        ("https://x.test/", 200, html_with_links(&["/a", "/b"])),
        ("https://x.test/a", 200, html_with_links(&["/c"])),
        ("https://x.test/c", 200, html_with_links(&[])),
        ("https://x.test/b", 404, "not found".to_string()),
    ];
    for (target, status, body) in pages {
        Mock::given(method("GET"))
            .and(path("/fetch"))
            .and(query_param("url", target))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let config = create_test_config(2, 2).with_route(FetchRoute::Proxy(format!(
        "{}/fetch?url={{url}}",
        mock_server.uri()
    )));

    let outcome = crawl(config).await.expect("Crawl failed");

    assert_eq!(outcome.status(), CrawlStatus::Complete);
    let crawled: Vec<&str> = outcome.pages.iter().map(|p| p.url.as_str()).collect();
    assert_eq!(
        crawled,
        vec!["https://x.test/", "https://x.test/a", "https://x.test/c"]
    );

    let failed: Vec<&NormalizedUrl> = outcome.failed_urls.iter().map(|f| &f.url).collect();
    assert_eq!(failed, vec![&url("/b")]);
    assert_eq!(
        outcome.failed_urls[0].reason,
        FetchError::Status { status: 404 }
    );

    let root = outcome.page(&url("/")).unwrap();
    assert!(!root.link_graph.is_orphan);
    assert_eq!(root.link_graph.internal_link_equity, 0);
    assert_eq!(root.link_graph.broken_links_on_page, vec![url("/b")]);

    let a = outcome.page(&url("/a")).unwrap();
    assert!(a.link_graph.broken_links_on_page.is_empty());

    let c = outcome.page(&url("/c")).unwrap();
    assert!(!c.link_graph.is_orphan);
    assert_eq!(c.link_graph.internal_link_equity, 1);

    assert_eq!(outcome.orphan_count, 0);
    assert_eq!(outcome.broken_link_count, 1);
    assert!(outcome.page(&url("/b")).is_none());
}

#[tokio::test]
async fn test_direct_crawl_from_config_file() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"<html lang="en"><body>
            <h1>Home</h1>
            <a href="{}/about/">About</a>
            <a href="/logo.png">Logo</a>
            <a href="https://elsewhere.test/">Elsewhere</a>
            <a href="mailto:team@example.com">Mail</a>
            </body></html>"#,
            base_url
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/about/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(html_with_links(&["/", "#top"])),
        )
        .mount(&mock_server)
        .await;

    let config = parse_config(&format!(
        "[crawler]\nseed-url = \"{}\"\ndirect = true\ncrawl-delay = 0\nconcurrency = 2\n",
        base_url
    ))
    .unwrap();
    let crawl_config = CrawlConfig::from_config(&config).unwrap();

    let outcome = crawl(crawl_config).await.unwrap();

    assert_eq!(outcome.pages.len(), 2);
    assert!(outcome.failed_urls.is_empty());

    let about = NormalizedUrl::parse(&format!("{}/about", base_url)).unwrap();
    let about_page = outcome.page(&about).unwrap();
    assert_eq!(about_page.depth, 1);
    assert_eq!(about_page.link_graph.internal_link_equity, 1);
    assert_eq!(outcome.pages[0].link_graph.internal_link_equity, 1);

    // The asset and the external link are never requested
    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| r.url.path() != "/logo.png"));
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn test_directory_links_keep_their_trailing_slash() {
    let fetcher = Arc::new(FixtureFetcher::new(&[
        ("/", &["docs/"]),
        ("/docs/", &["intro", "../"]),
        ("/docs/intro", &[]),
    ]));

    let outcome = run_fixture(create_test_config(3, 2), &fetcher).await;

    let crawled: Vec<&str> = outcome.pages.iter().map(|p| p.url.as_str()).collect();
    assert_eq!(
        crawled,
        vec!["https://x.test/", "https://x.test/docs", "https://x.test/docs/intro"]
    );
    assert!(outcome.failed_urls.is_empty());
    assert_eq!(outcome.broken_link_count, 0);

    let counts = fetcher.fetch_counts.lock().unwrap();
    assert_eq!(counts.get("https://x.test/docs/"), Some(&1));
    assert!(!counts.contains_key("https://x.test/docs"));
    assert!(!counts.contains_key("https://x.test/intro"));
}

#[tokio::test]
async fn test_unreachable_seed_is_distinguishable() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let config = create_test_config(2, 1).with_route(FetchRoute::Proxy(format!(
        "{}/fetch?url={{url}}",
        mock_server.uri()
    )));

    let outcome = crawl(config).await.unwrap();

    assert_eq!(outcome.status(), CrawlStatus::NothingReachable);
    assert!(outcome.pages.is_empty());
    assert_eq!(outcome.failed_urls.len(), 1);
    assert_eq!(
        outcome.failed_urls[0].reason,
        FetchError::Status { status: 500 }
    );
}

#[tokio::test]
async fn test_at_most_once_on_dense_graph() {
    let all: Vec<String> = (0..20).map(|i| format!("/p{}", i)).collect();
    let links: Vec<&str> = all.iter().map(String::as_str).chain(["/", "/p0/", "/missing"]).collect();

    let mut site: Vec<(&str, &[&str])> = vec![("/", links.as_slice())];
    for page in &all {
        site.push((page.as_str(), links.as_slice()));
    }
    let fetcher = Arc::new(FixtureFetcher::new(&site));

    let outcome = run_fixture(create_test_config(3, 8), &fetcher).await;

    assert_eq!(outcome.pages.len(), 21);
    assert_eq!(outcome.failed_urls.len(), 1);
    assert_at_most_once(&outcome, &fetcher);

    // Every page links to /missing
    assert_eq!(outcome.broken_link_count, 21);
}

#[tokio::test]
async fn test_depth_bound() {
    let fetcher = Arc::new(FixtureFetcher::chain(6));

    let outcome = run_fixture(create_test_config(2, 2), &fetcher).await;

    let crawled: Vec<&str> = outcome.pages.iter().map(|p| p.url.path()).collect();
    assert_eq!(crawled, vec!["/", "/1", "/2"]);
    assert!(outcome.pages.iter().all(|p| p.depth <= 2));
    assert!(!fetcher
        .fetch_counts
        .lock()
        .unwrap()
        .contains_key("https://x.test/3"));
}

#[tokio::test]
async fn test_depth_zero_fetches_only_seed() {
    let fetcher = Arc::new(FixtureFetcher::chain(3));

    let outcome = run_fixture(create_test_config(0, 4), &fetcher).await;

    assert_eq!(outcome.pages.len(), 1);
    assert_eq!(outcome.pages[0].outgoing_links, vec![url("/1")]);
    assert_eq!(outcome.status(), CrawlStatus::Complete);
}

#[tokio::test]
async fn test_terminates_on_cycles() {
    let fetcher = Arc::new(FixtureFetcher::new(&[
        ("/", &["/a"]),
        ("/a", &["/b"]),
        ("/b", &["/", "/a", "/c"]),
        ("/c", &["/c", "/"]),
    ]));

    for concurrency in [1, 3, 16] {
        let outcome = tokio::time::timeout(
            Duration::from_secs(10),
            run_fixture(create_test_config(10, concurrency), &fetcher),
        )
        .await
        .expect("crawl did not terminate");

        assert_eq!(outcome.pages.len(), 4);
        assert!(outcome.complete);
    }
}

#[tokio::test]
async fn test_concurrency_bound() {
    let children: Vec<String> = (0..30).map(|i| format!("/c{}", i)).collect();
    let child_links: Vec<&str> = children.iter().map(String::as_str).collect();
    let mut site: Vec<(&str, &[&str])> = vec![("/", child_links.as_slice())];
    for child in &child_links {
        site.push((*child, NO_LINKS));
    }
    let fetcher =
        Arc::new(FixtureFetcher::new(&site).with_latency(Duration::from_millis(20)));

    let outcome = run_fixture(create_test_config(1, 3), &fetcher).await;

    assert_eq!(outcome.pages.len(), 31);
    let peak = fetcher.peak.load(Ordering::SeqCst);
    assert!(peak <= 3, "peak concurrency {} exceeded 3", peak);
    assert!(peak >= 2, "workers never overlapped");
}

#[tokio::test]
async fn test_cancellation_leaves_partial_outcome() {
    let fetcher =
        Arc::new(FixtureFetcher::chain(50).with_latency(Duration::from_millis(20)));
    let token = CancellationToken::new();

    let coordinator =
        Coordinator::with_collaborators(create_test_config(100, 2), Arc::clone(&fetcher), HtmlAnalyzer)
            .with_cancellation(token.clone());

    let cancel = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(120)).await;
        token.cancel();
    });

    let outcome = coordinator.run().await;
    cancel.await.unwrap();

    assert_eq!(outcome.status(), CrawlStatus::Incomplete);
    assert!(!outcome.pages.is_empty());
    assert!(outcome.pages.len() < 50);
    assert_at_most_once(&outcome, &fetcher);

    // The link graph still runs over the partial store
    let last = outcome.pages.last().unwrap();
    assert!(!last.link_graph.is_orphan || last.url == outcome.seed);
}

#[tokio::test]
async fn test_link_equity_additivity() {
    let fetcher = Arc::new(FixtureFetcher::new(&[
        ("/", &["/a", "/b", "/c", "https://elsewhere.test/", "/gone"]),
        ("/a", &["/b", "/b/", "/c#x", "/"]),
        ("/b", &["/c", "/b"]),
        ("/c", &["/a"]),
    ]));

    let outcome = run_fixture(create_test_config(3, 2), &fetcher).await;

    let crawled: HashSet<&NormalizedUrl> = outcome.pages.iter().map(|p| &p.url).collect();
    let edges: usize = outcome
        .pages
        .iter()
        .map(|p| {
            p.outgoing_links
                .iter()
                .filter(|l| crawled.contains(l))
                .count()
        })
        .sum();
    let equity: u32 = outcome
        .pages
        .iter()
        .map(|p| p.link_graph.internal_link_equity)
        .sum();

    assert_eq!(equity as usize, edges);
    // / -> a,b,c; a -> b,c,/; b -> c,b; c -> a
    assert_eq!(edges, 9);
    assert_eq!(outcome.page(&url("/c")).unwrap().link_graph.internal_link_equity, 3);
    assert_eq!(outcome.page(&url("/b")).unwrap().link_graph.internal_link_equity, 3);
}

#[tokio::test]
async fn test_known_url_orphan_detection() {
    let fetcher = Arc::new(FixtureFetcher::new(&[
        ("/", &["/a"]),
        ("/a", &["/"]),
        ("/hidden", &["/a"]),
    ]));

    let config = create_test_config(2, 2).with_known_urls(vec![url("/hidden")]);
    let outcome = run_fixture(config, &fetcher).await;

    assert_eq!(outcome.pages.len(), 3);
    assert!(outcome.page(&url("/hidden")).unwrap().link_graph.is_orphan);
    assert!(!outcome.page(&url("/")).unwrap().link_graph.is_orphan);
    assert!(!outcome.page(&url("/a")).unwrap().link_graph.is_orphan);
    assert_eq!(outcome.orphan_count, 1);
    assert_eq!(outcome.orphans().count(), 1);
}

#[tokio::test]
async fn test_seed_without_inbound_links_is_not_orphan() {
    let fetcher = Arc::new(FixtureFetcher::new(&[("/", &["/a"]), ("/a", &[])]));

    let outcome = run_fixture(create_test_config(2, 1), &fetcher).await;

    let root = outcome.page(&url("/")).unwrap();
    assert_eq!(root.link_graph.internal_link_equity, 0);
    assert!(!root.link_graph.is_orphan);
}
