//! End-to-end aggregation over real HTTP: wiremock serves the feeds and the
//! reqwest-backed fetcher retrieves and parses them.

use jobfeed::feed::{HttpFetcher, SourceRegistry};
use jobfeed::jobs::{Aggregator, EntryLevelClassifier, SearchRequest};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const JOBS_RSS: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
    <title>Jobs</title>
    <item>
        <guid>101</guid>
        <title>Junior Frontend Developer</title>
        <link>https://jobs.example.com/101</link>
        <pubDate>Mon, 01 Jan 2024 00:00:00 +0000</pubDate>
        <description>&lt;p&gt;React &amp;amp; CSS&lt;/p&gt;</description>
    </item>
    <item>
        <guid>102</guid>
        <title>Senior Rust Engineer</title>
        <link>https://jobs.example.com/102</link>
        <pubDate>Fri, 01 Mar 2024 00:00:00 +0000</pubDate>
        <description>Entry-level candidates need not apply</description>
    </item>
    <item>
        <guid>103</guid>
        <link>https://jobs.example.com/103</link>
    </item>
</channel></rss>"#;

async fn feed_server(template: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rss"))
        .respond_with(template)
        .expect(1)
        .mount(&server)
        .await;
    server
}

fn aggregator(registry: SourceRegistry, timeout: Duration) -> Aggregator {
    let fetcher = HttpFetcher::new(reqwest::Client::new()).with_timeout(timeout);
    Aggregator::new(
        Arc::new(registry),
        Arc::new(fetcher),
        EntryLevelClassifier::standard().unwrap(),
    )
}

#[tokio::test]
async fn test_broken_feed_does_not_block_healthy_feed() {
    let healthy = feed_server(ResponseTemplate::new(200).set_body_string(JOBS_RSS)).await;
    let broken = feed_server(ResponseTemplate::new(500)).await;
    let garbled = feed_server(ResponseTemplate::new(200).set_body_string("<html>oops")).await;

    let registry = SourceRegistry::from_pairs([
        ("Broken", format!("{}/rss", broken.uri())),
        ("Healthy", format!("{}/rss", healthy.uri())),
        ("Garbled", format!("{}/rss", garbled.uri())),
    ])
    .unwrap();

    let outcome = aggregator(registry, Duration::from_secs(5))
        .search(&SearchRequest::default())
        .await
        .unwrap();

    let ids: Vec<&str> = outcome.jobs.iter().map(|j| j.id.as_str()).collect();
    // Untitled item 103 is dropped by normalization
    assert_eq!(ids, vec!["Healthy-102", "Healthy-101"]);
    assert_eq!(outcome.jobs[1].summary.as_deref(), Some("React & CSS"));
    assert_eq!(
        outcome.jobs[1].published_at.as_deref(),
        Some("2024-01-01T00:00:00.000Z")
    );

    let failed: Vec<String> = outcome
        .failed_sources()
        .map(|r| r.source.to_string())
        .collect();
    assert_eq!(failed, vec!["Broken", "Garbled"]);
}

#[tokio::test]
async fn test_entry_only_over_http() {
    let server = feed_server(ResponseTemplate::new(200).set_body_string(JOBS_RSS)).await;
    let registry = SourceRegistry::from_pairs([("Jobs", format!("{}/rss", server.uri()))]).unwrap();

    let jobs = aggregator(registry, Duration::from_secs(5))
        .aggregate(&SearchRequest::new("").entry_only(true))
        .await
        .unwrap();

    let ids: Vec<&str> = jobs.iter().map(|j| j.id.as_str()).collect();
    assert_eq!(ids, vec!["Jobs-101"]);
}

#[tokio::test]
async fn test_hung_feed_is_cut_off_by_timeout() {
    let slow = feed_server(
        ResponseTemplate::new(200)
            .set_body_string(JOBS_RSS)
            .set_delay(Duration::from_secs(10)),
    )
    .await;
    let fast = feed_server(ResponseTemplate::new(200).set_body_string(JOBS_RSS)).await;

    let registry = SourceRegistry::from_pairs([
        ("Slow", format!("{}/rss", slow.uri())),
        ("Fast", format!("{}/rss", fast.uri())),
    ])
    .unwrap();

    let started = std::time::Instant::now();
    let outcome = aggregator(registry, Duration::from_millis(200))
        .search(&SearchRequest::new("junior"))
        .await
        .unwrap();

    assert!(started.elapsed() < Duration::from_secs(5));
    let ids: Vec<&str> = outcome.jobs.iter().map(|j| j.id.as_str()).collect();
    assert_eq!(ids, vec!["Fast-101"]);
    assert!(outcome.sources[0]
        .error
        .as_deref()
        .is_some_and(|e| e.contains("timed out")));
}

#[tokio::test]
async fn test_item_without_guid_is_keyed_by_link() {
    let rss = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
    <title>Jobs</title>
    <item>
        <title>Junior Dev</title>
        <link>https://jobs.example.com/7</link>
        <pubDate>Mon, 01 Jan 2024 00:00:00 +0000</pubDate>
    </item>
</channel></rss>"#;
    let server = feed_server(ResponseTemplate::new(200).set_body_string(rss)).await;
    let registry =
        SourceRegistry::from_pairs([("RemoteOK", format!("{}/rss", server.uri()))]).unwrap();

    let jobs = aggregator(registry, Duration::from_secs(5))
        .aggregate(&SearchRequest::default())
        .await
        .unwrap();

    let ids: Vec<&str> = jobs.iter().map(|j| j.id.as_str()).collect();
    assert_eq!(ids, vec!["RemoteOK-https://jobs.example.com/7"]);
}
