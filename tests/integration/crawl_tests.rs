//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use link_ripple::config::{Config, CrawlerConfig};
use link_ripple::crawler::{get_result, run_crawl, Coordinator, CrawlJob, CrawlResult};
use link_ripple::CrawlError;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with the given depth and parser
fn create_test_config(depth: u32, use_regex: bool) -> CrawlerConfig {
    CrawlerConfig {
        depth,
        workers: 4,
        use_regex_for_parsing: use_regex,
        fetch_timeout_secs: 5,
        ..CrawlerConfig::default()
    }
}

/// Waits for a job, failing the test instead of hanging if it never terminates
async fn finish(job: CrawlJob) -> CrawlResult {
    tokio::time::timeout(Duration::from_secs(20), get_result(job))
        .await
        .expect("crawl job did not terminate")
}

async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// Mounts a home page linking to two inner pages and one external site
async fn mount_three_page_site(server: &MockServer) {
    mount_page(
        server,
        "/",
        r##"<html><head><title>Home</title></head><body>
            <a href="/page1">Page 1</a>
            <a href="page2">Page 2</a>
            <a href="https://external.example.org/">Elsewhere</a>
            <a href="mailto:someone@example.com">Mail</a>
            <a href="#top">Top</a>
        </body></html>"##
            .to_string(),
    )
    .await;

    mount_page(
        server,
        "/page1",
        r#"<html><head><title>Page 1</title></head><body>
            <a href="/">Home</a>
            <a href="/page2">Page 2</a>
        </body></html>"#
            .to_string(),
    )
    .await;

    mount_page(
        server,
        "/page2",
        r#"<html><head><title>Page 2</title></head><body>
            <a href="/">Home</a>
            <a href="https://external.example.org/">Elsewhere again</a>
        </body></html>"#
            .to_string(),
    )
    .await;
}

async fn crawl_three_page_site(use_regex: bool) {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_three_page_site(&mock_server).await;

    let coordinator =
        Coordinator::new(create_test_config(2, use_regex)).expect("Failed to create coordinator");
    let job = coordinator
        .start(&format!("{}/", base_url))
        .expect("Failed to start job");
    let result = finish(job).await;

    assert_eq!(result.inner_links_count, 3);
    assert_eq!(result.external_links_count, 1);
    assert_eq!(result.external_links, vec!["https://external.example.org/"]);
    assert_eq!(result.failed_links_count, 0);
    assert!(result.requests_per_sec > 0.0);

    let titles: Vec<String> = result.sitemap.values().map(|t| t.to_lowercase()).collect();
    assert_eq!(titles.len(), 3);
    for expected in ["home", "page 1", "page 2"] {
        assert!(titles.iter().any(|t| t == expected), "missing title {}", expected);
    }

    assert!(result.sitemap.contains_key(&format!("{}/", base_url)));
    assert!(result.sitemap.contains_key(&format!("{}/page1", base_url)));
    assert!(result.sitemap.contains_key(&format!("{}/page2", base_url)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_full_crawl_structural_parser() {
    crawl_three_page_site(false).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_full_crawl_regex_parser() {
    crawl_three_page_site(true).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_pages_are_fetched_once() {
    let mock_server = MockServer::start().await;

    // Every page links to every other page
    let links = r#"<a href="/">h</a><a href="/a">a</a><a href="/b">b</a><a href="/c">c</a>"#;
    for route in ["/", "/a", "/b", "/c"] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_string(format!(
                "<html><head><title>{}</title></head><body>{}</body></html>",
                route, links
            )))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let config = CrawlerConfig {
        workers: 8,
        ..create_test_config(5, false)
    };
    let coordinator = Coordinator::new(config).unwrap();
    let job = coordinator
        .start(&format!("{}/", mock_server.uri()))
        .unwrap();
    let result = finish(job).await;

    assert_eq!(result.inner_links_count, 4);
    // Mock expectations are verified when the server is dropped
}

#[tokio::test]
async fn test_depth_limit_is_respected() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<html><body><a href="/d1">next</a></body></html>"#.to_string(),
    )
    .await;
    mount_page(
        &mock_server,
        "/d1",
        r#"<html><body><a href="/d2">next</a></body></html>"#.to_string(),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/d2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let coordinator = Coordinator::new(create_test_config(2, false)).unwrap();
    let job = coordinator
        .start(&format!("{}/", mock_server.uri()))
        .unwrap();
    let result = finish(job).await;

    assert_eq!(result.inner_links_count, 2);
    assert!(!result
        .sitemap
        .contains_key(&format!("{}/d2", mock_server.uri())));
}

#[tokio::test]
async fn test_depth_one_fetches_only_seed() {
    let mock_server = MockServer::start().await;
    mount_three_page_site(&mock_server).await;

    let coordinator = Coordinator::new(create_test_config(1, false)).unwrap();
    let job = coordinator
        .start(&format!("{}/", mock_server.uri()))
        .unwrap();
    let result = finish(job).await;

    assert_eq!(result.inner_links_count, 1);
    // Externals on the seed are still recorded
    assert_eq!(result.external_links_count, 1);
}

#[tokio::test]
async fn test_failed_pages_are_counted() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<html><head><title>Home</title></head><body>
            <a href="/missing">Broken</a>
            <a href="/ok">Fine</a>
        </body></html>"#
            .to_string(),
    )
    .await;
    mount_page(
        &mock_server,
        "/ok",
        "<html><head><title>Ok</title></head></html>".to_string(),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let coordinator = Coordinator::new(create_test_config(3, false)).unwrap();
    let job = coordinator
        .start(&format!("{}/", mock_server.uri()))
        .unwrap();
    let result = finish(job).await;

    assert_eq!(result.inner_links_count, 2);
    assert_eq!(result.failed_links_count, 1);
    assert!(!result
        .sitemap
        .contains_key(&format!("{}/missing", mock_server.uri())));
}

#[tokio::test]
async fn test_unreachable_seed_terminates() {
    let coordinator = Coordinator::new(create_test_config(3, false)).unwrap();
    let job = coordinator.start("http://127.0.0.1:1/").unwrap();
    let result = finish(job).await;

    assert_eq!(result.inner_links_count, 0);
    assert_eq!(result.failed_links_count, 1);
    assert_eq!(result.requests_per_sec, 0.0);
    assert_eq!(result.domain, "127.0.0.1:1");
}

#[tokio::test]
async fn test_close_before_start_fetches_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let coordinator = Coordinator::new(create_test_config(3, false)).unwrap();
    coordinator.close();
    assert!(coordinator.is_closed());

    let job = coordinator
        .start(&format!("{}/", mock_server.uri()))
        .unwrap();
    let result = finish(job).await;

    assert_eq!(result.inner_links_count, 0);
    assert_eq!(result.failed_links_count, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_close_stops_running_job() {
    let mock_server = MockServer::start().await;

    // A slow page that links to many more pages
    let links: String = (0..50)
        .map(|i| format!(r#"<a href="/p{}">p</a>"#, i))
        .collect();
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(format!("<html><body>{}</body></html>", links))
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&mock_server)
        .await;

    let workers = 2;
    let config = CrawlerConfig {
        workers,
        ..create_test_config(3, false)
    };
    let coordinator = Coordinator::new(config).unwrap();
    let job = coordinator
        .start(&format!("{}/", mock_server.uri()))
        .unwrap();

    // The seed has been fetched and the first children are in flight
    tokio::time::sleep(Duration::from_millis(300)).await;
    coordinator.close();

    let result = finish(job).await;

    // Only the seed and the pages already in flight at close() were requested
    let requests = mock_server.received_requests().await.unwrap();
    assert!(
        requests.len() <= 1 + workers as usize,
        "{} requests after close",
        requests.len()
    );
    assert!(result.inner_links_count <= 1 + workers as usize);
    assert!(result.inner_links_count >= 1);
}

#[tokio::test]
async fn test_latin1_page_links_are_followed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(
            b"<html><head><title>Caf\xe9</title></head><body><a href=\"/a\">a</a></body></html>"
                .to_vec(),
        ))
        .mount(&mock_server)
        .await;
    mount_page(
        &mock_server,
        "/a",
        "<html><head><title>A</title></head></html>".to_string(),
    )
    .await;

    // Default settings use the structural parser
    let coordinator = Coordinator::new(create_test_config(3, false)).unwrap();
    let job = coordinator
        .start(&format!("{}/", mock_server.uri()))
        .unwrap();
    let result = finish(job).await;

    assert_eq!(result.inner_links_count, 2);
    assert_eq!(result.failed_links_count, 0);
    assert!(result
        .sitemap
        .contains_key(&format!("{}/a", mock_server.uri())));
}

#[tokio::test]
async fn test_zero_depth_is_rejected() {
    let config = CrawlerConfig {
        depth: 0,
        ..create_test_config(1, false)
    };
    assert!(matches!(
        Coordinator::new(config),
        Err(CrawlError::Config(_))
    ));
}

#[tokio::test]
async fn test_invalid_seed_is_rejected() {
    let coordinator = Coordinator::new(create_test_config(3, false)).unwrap();

    assert!(matches!(
        coordinator.start("not a url"),
        Err(CrawlError::UrlParse { .. })
    ));
    assert!(matches!(
        coordinator.start("mailto:someone@example.com"),
        Err(CrawlError::Url(_))
    ));
}

#[tokio::test]
async fn test_jobs_share_one_coordinator() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;
    mount_three_page_site(&first).await;
    mount_page(
        &second,
        "/",
        "<html><head><title>Solo</title></head></html>".to_string(),
    )
    .await;

    let config = Config {
        crawler: create_test_config(2, false),
    };
    let seeds = vec![
        format!("{}/", first.uri()),
        "::not-a-seed::".to_string(),
        format!("{}/", second.uri()),
    ];
    let mut reported = Vec::new();
    let results = run_crawl(config, &seeds, |result| reported.push(result.domain.clone()))
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(reported.len(), 2);
    assert_eq!(reported[0], results[0].domain);
    assert_eq!(results[0].inner_links_count, 3);
    assert_eq!(results[1].inner_links_count, 1);
}
