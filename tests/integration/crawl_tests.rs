//! Integration tests for the harvest pipeline
//!
//! These tests use wiremock to stand in for the review site and test
//! each sitemap level and the full crawl end-to-end.

use good_spots::config::Config;
use good_spots::crawler::{CrawlLimits, Harvester, Stage};
use good_spots::{FetchFailure, HarvestError};
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RESTAURANT_PAGE: &str = r##"<!DOCTYPE html>
<html lang="ja">
<head>
<script type="application/ld+json">{"@context":"http://schema.org","@type":"Restaurant","name":"寿司 一","aggregateRating":{"@type":"AggregateRating","ratingValue":"3.72","ratingCount":"88"},"servesCuisine":"寿司、海鮮","telephone":"03-9876-5432"}</script>
</head>
<body>
<div class="rdheader-info"><span>最寄り駅:</span><span>銀座駅</span></div>
<div class="rdheader-budget">
  <p><i class="c-rating-v3__time--dinner">夜</i>
     <a class="rdheader-budget__price-target" href="#">￥20,000～￥29,999</a></p>
  <p><i class="c-rating-v3__time--lunch">昼</i>
     <a class="rdheader-budget__price-target" href="#">￥5,000～￥5,999</a></p>
</div>
<table><tr><th>住所</th><td>東京都中央区銀座5-5-5
地図</td></tr></table>
</body>
</html>"##;

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, root: &Path) -> Config {
    let mut config = Config::default()
        .with_base_url(base_url)
        .with_output_root(root);
    config.http.user_agent = "TestHarvester/1.0".to_string();
    config.http.timeout_secs = 5;
    config
}

async fn mount_page(server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

async fn mount_status(server: &MockServer, page_path: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_collect_city_writes_area_table() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/sitemap/tokyo/",
        format!(
            r#"<html><body>
            <a href="{}/sitemap/tokyo/A1301-A130101/">銀座</a>
            <a href="/sitemap/tokyo/A1302-A130201/">丸の内</a>
            <a href="A1303-A130301/">渋谷</a>
            <a href="/sitemap/osaka/A2701-A270101/">梅田</a>
            <a href="/sitemap/">全国</a>
            </body></html>"#,
            base_url
        ),
    )
    .await;

    let harvester = Harvester::new(create_test_config(&base_url, output.path())).unwrap();
    let areas = harvester.collect_city("tokyo").await.unwrap();

    let codes: Vec<&str> = areas.iter().map(|a| a.code.as_str()).collect();
    assert_eq!(codes, vec!["A1301-A130101", "A1302-A130201", "A1303-A130301"]);
    for area in &areas {
        assert!(area
            .url
            .as_str()
            .starts_with(&format!("{}/sitemap/tokyo/", base_url)));
    }

    let csv = fs::read_to_string(output.path().join("cities/tokyo.csv")).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some(r#""area_name","area_code","url""#));
    assert_eq!(
        lines.next().map(str::to_string),
        Some(format!(
            r#""銀座","A1301-A130101","{}/sitemap/tokyo/A1301-A130101/""#,
            base_url
        ))
    );
    assert_eq!(csv.lines().count(), 4);
}

#[tokio::test]
async fn test_collect_city_fetch_failure_writes_nothing() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_status(&mock_server, "/sitemap/atlantis/", 404).await;

    let harvester =
        Harvester::new(create_test_config(&mock_server.uri(), output.path())).unwrap();
    let result = harvester.collect_city("atlantis").await;

    match result {
        Err(HarvestError::Fetch(e)) => {
            assert_eq!(e.cause, FetchFailure::Status(404));
            assert!(e.url.ends_with("/sitemap/atlantis/"));
        }
        other => panic!("expected fetch error, got {:?}", other),
    }
    assert!(!output.path().join("cities").exists());
}

#[tokio::test]
async fn test_area_walk_isolates_sound_page_failures() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/sitemap/tokyo/A1316-A131602/",
        r#"<html><body>
            <a href="/sitemap/tokyo/A1316-A131602/a/">あ</a>
            <a href="/sitemap/tokyo/A1316-A131602/ka/">か</a>
            <a href="/sitemap/tokyo/A1316-A131602/sa/">さ</a>
            <a href="/sitemap/tokyo/A1316-A131602/all/">すべて</a>
        </body></html>"#
            .to_string(),
    )
    .await;
    mount_page(
        &mock_server,
        "/sitemap/tokyo/A1316-A131602/a/",
        r#"<html><body>
            <a href="/tokyo/A1316/A131602/13000001/">あさひ</a>
            <a href="/tokyo/A1316/A131602/13000002/"></a>
        </body></html>"#
            .to_string(),
    )
    .await;
    mount_status(&mock_server, "/sitemap/tokyo/A1316-A131602/ka/", 500).await;
    mount_page(
        &mock_server,
        "/sitemap/tokyo/A1316-A131602/sa/",
        r#"<html><body>
            <a href="/tokyo/A1316/A131602/13000003/">さくら</a>
        </body></html>"#
            .to_string(),
    )
    .await;

    let harvester = Harvester::new(create_test_config(&base_url, output.path())).unwrap();
    let area_url = Url::parse(&format!("{}/sitemap/tokyo/A1316-A131602/", base_url)).unwrap();
    let harvest = harvester.collect_area(&area_url).await.unwrap();

    let names: Vec<&str> = harvest.restaurants.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["あさひ", "さくら"]);

    assert_eq!(harvest.failures.len(), 1);
    assert_eq!(harvest.failures[0].stage, Stage::SoundPage);
    assert!(harvest.failures[0].url.ends_with("/A1316-A131602/ka/"));

    let listing =
        fs::read_to_string(output.path().join("tokyo/A1316-A131602.txt")).unwrap();
    assert_eq!(
        listing,
        format!(
            "あさひ\t{base}/tokyo/A1316/A131602/13000001/\nさくら\t{base}/tokyo/A1316/A131602/13000003/\n",
            base = base_url
        )
    );
}

#[tokio::test]
async fn test_area_without_sound_links_yields_no_restaurants() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/sitemap/tokyo/A1399-A139999/",
        "<html><body><p>該当なし</p></body></html>".to_string(),
    )
    .await;

    let harvester =
        Harvester::new(create_test_config(&mock_server.uri(), output.path())).unwrap();
    let area_url = Url::parse(&format!(
        "{}/sitemap/tokyo/A1399-A139999/",
        mock_server.uri()
    ))
    .unwrap();
    let harvest = harvester.collect_area(&area_url).await.unwrap();

    assert!(harvest.restaurants.is_empty());
    assert!(harvest.failures.is_empty());
    let listing =
        fs::read_to_string(output.path().join("tokyo/A1399-A139999.txt")).unwrap();
    assert!(listing.is_empty());
}

#[tokio::test]
async fn test_area_url_without_trailing_slash() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/sitemap/tokyo/A1316-A131602/",
        r#"<html><body>
            <a href="a/">あ</a>
            <a href="/sitemap/tokyo/A1316-A131602/ka/">か</a>
        </body></html>"#
            .to_string(),
    )
    .await;
    mount_page(
        &mock_server,
        "/sitemap/tokyo/A1316-A131602/a/",
        r#"<html><body><a href="/tokyo/A1316/A131602/13000001/">あさひ</a></body></html>"#
            .to_string(),
    )
    .await;
    mount_page(
        &mock_server,
        "/sitemap/tokyo/A1316-A131602/ka/",
        r#"<html><body><a href="/tokyo/A1316/A131602/13000004/">かもめ</a></body></html>"#
            .to_string(),
    )
    .await;

    let harvester = Harvester::new(create_test_config(&base_url, output.path())).unwrap();
    let area_url = Url::parse(&format!("{}/sitemap/tokyo/A1316-A131602", base_url)).unwrap();
    let harvest = harvester.collect_area(&area_url).await.unwrap();

    let names: Vec<&str> = harvest.restaurants.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["あさひ", "かもめ"]);
    assert!(harvest.failures.is_empty());
    assert!(harvest.area.url.path().ends_with("/A1316-A131602/"));
}

#[tokio::test]
async fn test_harvest_restaurant_writes_raw_page_and_record() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/tokyo/A1317/A131706/13120700/",
        RESTAURANT_PAGE.to_string(),
    )
    .await;

    let harvester =
        Harvester::new(create_test_config(&mock_server.uri(), output.path())).unwrap();
    let url = Url::parse(&format!(
        "{}/tokyo/A1317/A131706/13120700/",
        mock_server.uri()
    ))
    .unwrap();
    let harvested = harvester.harvest_restaurant(&url).await.unwrap();

    assert_eq!(harvested.stem, "tokyo-A1317-A131706-13120700");
    assert_eq!(
        harvested.raw_path,
        output
            .path()
            .join("restaurants/tokyo-A1317-A131706-13120700.html")
    );
    assert_eq!(fs::read_to_string(&harvested.raw_path).unwrap(), RESTAURANT_PAGE);

    let record = &harvested.record;
    assert_eq!(record.restaurant_name, "寿司 一");
    assert_eq!(record.review_score, "3.72");
    assert_eq!(record.review_count, "88");
    assert_eq!(record.restaurant_genre, vec!["寿司", "海鮮"]);
    assert_eq!(record.closest_train_station, "銀座");
    assert_eq!(record.address, "東京都中央区銀座5-5-5");
    assert_eq!(record.telephone, "03-9876-5432");
    assert_eq!(record.price_dinner_min, "20000");
    assert_eq!(record.price_dinner_max, "29999");
    assert_eq!(record.price_lunch_min, "5000");
    assert_eq!(record.price_lunch_max, "5999");

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&harvested.record_path).unwrap()).unwrap();
    assert_eq!(json["restaurantName"], "寿司 一");
    assert_eq!(json["priceDinnerMin"], "20000");
}

#[tokio::test]
async fn test_harvest_restaurant_fetch_failure_writes_nothing() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_status(&mock_server, "/tokyo/A1317/A131706/13999999/", 404).await;

    let harvester =
        Harvester::new(create_test_config(&mock_server.uri(), output.path())).unwrap();
    let url = Url::parse(&format!(
        "{}/tokyo/A1317/A131706/13999999/",
        mock_server.uri()
    ))
    .unwrap();

    let result = harvester.harvest_restaurant(&url).await;
    assert!(matches!(result, Err(HarvestError::Fetch(_))));
    assert!(!output.path().join("restaurants").exists());
}

#[tokio::test]
async fn test_full_crawl_city() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/sitemap/tokyo/",
        r#"<html><body>
            <a href="/sitemap/tokyo/A1301-A130101/">銀座</a>
            <a href="/sitemap/tokyo/A1302-A130201/">丸の内</a>
            <a href="/sitemap/tokyo/A1301-A130101/">銀座</a>
        </body></html>"#
            .to_string(),
    )
    .await;
    mount_page(
        &mock_server,
        "/sitemap/tokyo/A1301-A130101/",
        r#"<html><body><a href="a/">あ</a></body></html>"#.to_string(),
    )
    .await;
    mount_page(
        &mock_server,
        "/sitemap/tokyo/A1301-A130101/a/",
        r#"<html><body>
            <a href="/tokyo/A1301/A130101/13000001/">寿司 一</a>
            <a href="/tokyo/A1301/A130101/13000002/">天ぷら 二</a>
        </body></html>"#
            .to_string(),
    )
    .await;
    mount_status(&mock_server, "/sitemap/tokyo/A1302-A130201/", 500).await;
    mount_page(
        &mock_server,
        "/tokyo/A1301/A130101/13000001/",
        RESTAURANT_PAGE.to_string(),
    )
    .await;
    mount_status(&mock_server, "/tokyo/A1301/A130101/13000002/", 404).await;

    let harvester = Harvester::new(create_test_config(&base_url, output.path())).unwrap();
    let report = harvester
        .crawl_city("tokyo", CrawlLimits::default())
        .await
        .unwrap();

    assert_eq!(report.areas_found, 3);
    assert_eq!(report.areas_walked, 1);
    assert_eq!(report.restaurants_found, 2);
    assert_eq!(report.records_written, 1);
    assert_eq!(report.failures.len(), 2);
    assert_eq!(report.failures_at(Stage::AreaSitemap), 1);
    assert_eq!(report.failures_at(Stage::RestaurantPage), 1);
    assert!(report.finished_at.is_some());

    let root = output.path();
    assert!(root.join("cities/tokyo.csv").exists());
    assert!(root.join("tokyo/A1301-A130101.txt").exists());
    assert!(!root.join("tokyo/A1302-A130201.txt").exists());
    assert!(root
        .join("restaurants/tokyo-A1301-A130101-13000001.json")
        .exists());
    assert!(!root
        .join("restaurants/tokyo-A1301-A130101-13000002.html")
        .exists());

    let reports: Vec<_> = fs::read_dir(root.join("reports"))
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(reports.len(), 1);
    let summary = fs::read_to_string(&reports[0]).unwrap();
    assert!(summary.contains("| Records written | 1 |"));
    assert!(summary.contains("/tokyo/A1301/A130101/13000002/"));
}

#[tokio::test]
async fn test_full_crawl_respects_limits() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/sitemap/tokyo/",
        r#"<html><body>
            <a href="/sitemap/tokyo/A1301-A130101/">銀座</a>
            <a href="/sitemap/tokyo/A1302-A130201/">丸の内</a>
        </body></html>"#
            .to_string(),
    )
    .await;
    mount_page(
        &mock_server,
        "/sitemap/tokyo/A1301-A130101/",
        r#"<html><body><a href="a/">あ</a></body></html>"#.to_string(),
    )
    .await;
    mount_page(
        &mock_server,
        "/sitemap/tokyo/A1301-A130101/a/",
        r#"<html><body>
            <a href="/tokyo/A1301/A130101/13000001/">寿司 一</a>
            <a href="/tokyo/A1301/A130101/13000002/">天ぷら 二</a>
        </body></html>"#
            .to_string(),
    )
    .await;
    mount_page(
        &mock_server,
        "/tokyo/A1301/A130101/13000001/",
        RESTAURANT_PAGE.to_string(),
    )
    .await;

    let harvester =
        Harvester::new(create_test_config(&mock_server.uri(), output.path())).unwrap();
    let limits = CrawlLimits {
        max_areas: Some(1),
        max_restaurants_per_area: Some(1),
    };
    let report = harvester.crawl_city("tokyo", limits).await.unwrap();

    assert_eq!(report.areas_walked, 1);
    assert_eq!(report.restaurants_found, 2);
    assert_eq!(report.records_written, 1);
    assert!(report.failures.is_empty());
}
