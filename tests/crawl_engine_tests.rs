//! Crawl engine behaviour against a scripted browser

use site_mirror::crawl_engine::{PageFailure, StopReason, mirror_with_driver};
use site_mirror::{CrawlEngine, MirrorConfig, Readiness};
use tempfile::TempDir;

mod common;
use common::{FakeAsset, FakeDriver, FakePage, config, snapshot, url};

fn site_graph() -> FakeDriver {
    FakeDriver::with_pages(vec![
        ("/", FakePage::linking(&["/a/", "/b/"])),
        ("/a/", FakePage::linking(&["/c/", "/b/", "/"])),
        ("/b/", FakePage::linking(&["/d/", "/a/#comments", "https://h.test/b/"])),
        ("/c/", FakePage::linking(&["../"])),
        ("/d/", FakePage::linking(&[])),
    ])
}

#[tokio::test]
async fn visits_every_page_once_in_breadth_first_order() {
    let dir = TempDir::new().unwrap();
    let config = config(dir.path(), 100);
    let mut driver = site_graph();

    let summary = mirror_with_driver(&mut driver, &config).await.unwrap();

    let expected = vec![url("/"), url("/a/"), url("/b/"), url("/c/"), url("/d/")];
    assert_eq!(driver.navigations, expected);
    assert_eq!(
        summary.saved.iter().map(|p| p.url.clone()).collect::<Vec<_>>(),
        expected
    );
    assert_eq!(summary.stop_reason, StopReason::Drained);
    assert!(summary.failed.is_empty());
    assert!(driver.readiness.iter().all(|r| *r == Readiness::NetworkIdle));
}

#[tokio::test]
async fn budget_bounds_infinite_pagination() {
    let dir = TempDir::new().unwrap();
    let config = config(dir.path(), 4);
    let mut driver = FakeDriver::infinite_pagination();

    let summary = mirror_with_driver(&mut driver, &config).await.unwrap();

    assert_eq!(summary.pages_saved(), 4);
    assert_eq!(summary.stop_reason, StopReason::BudgetExhausted);
    assert_eq!(driver.navigations.len(), 4);
    assert_eq!(driver.navigations.last().unwrap(), &url("/page/3/"));
}

#[tokio::test]
async fn failed_pages_do_not_count_toward_budget() {
    let dir = TempDir::new().unwrap();
    let config = config(dir.path(), 3);
    let mut driver = FakeDriver::with_pages(vec![
        ("/", FakePage::linking(&["/missing/", "/slow/", "/broken/", "/one/", "/two/", "/three/"])),
        ("/slow/", FakePage::timing_out()),
        ("/broken/", FakePage::unreadable()),
        ("/one/", FakePage::linking(&[])),
        ("/two/", FakePage::linking(&[])),
        ("/three/", FakePage::linking(&[])),
    ]);

    let summary = mirror_with_driver(&mut driver, &config).await.unwrap();

    assert_eq!(
        summary.saved.iter().map(|p| p.url.clone()).collect::<Vec<_>>(),
        vec![url("/"), url("/one/"), url("/two/")]
    );
    assert_eq!(summary.stop_reason, StopReason::BudgetExhausted);
    assert_eq!(summary.pages_visited(), 6);

    let failures: Vec<_> = summary.failed.iter().map(|f| (&f.url, &f.failure)).collect();
    assert!(matches!(failures[0], (u, PageFailure::Navigation(_)) if *u == url("/missing/")));
    assert!(matches!(failures[1], (u, PageFailure::Timeout(_)) if *u == url("/slow/")));
    assert!(matches!(failures[2], (u, PageFailure::DomRead(_)) if *u == url("/broken/")));

    // Failed URLs are not retried
    assert_eq!(
        driver.navigations.iter().filter(|u| **u == url("/slow/")).count(),
        1
    );
}

#[tokio::test]
async fn administrative_and_foreign_links_are_never_followed() {
    let dir = TempDir::new().unwrap();
    let config = config(dir.path(), 50);
    let mut driver = FakeDriver::from_fn(|_| {
        Some(FakePage::linking(&[
            "/wp-admin/edit.php",
            "/wp-json/wp/v2/posts",
            "/xmlrpc.php",
            "https://other.test/",
            "http://h.test/plain-http/",
            "https://h.test:8443/port/",
            "mailto:owner@h.test",
        ]))
    });

    let summary = mirror_with_driver(&mut driver, &config).await.unwrap();

    assert_eq!(driver.navigations, vec![url("/")]);
    assert_eq!(summary.pages_saved(), 1);
    assert_eq!(
        snapshot(dir.path()).keys().cloned().collect::<Vec<_>>(),
        vec!["h.test/index.html".to_string()]
    );
}

#[tokio::test]
async fn rendered_html_lands_at_mapped_paths() {
    let dir = TempDir::new().unwrap();
    let config = config(dir.path(), 50);
    let mut driver = FakeDriver::with_pages(vec![
        ("/", FakePage::linking(&["/about", "/docs/guide/", "/feed.xml"])),
        ("/about", FakePage::linking(&[])),
        ("/docs/guide/", FakePage::linking(&[])),
        ("/feed.xml", FakePage::linking(&[])),
    ]);

    let summary = mirror_with_driver(&mut driver, &config).await.unwrap();

    let files = snapshot(dir.path());
    assert_eq!(
        files.keys().cloned().collect::<Vec<_>>(),
        vec![
            "h.test/about.html",
            "h.test/docs/guide/index.html",
            "h.test/feed.xml",
            "h.test/index.html",
        ]
    );
    assert!(String::from_utf8_lossy(&files["h.test/index.html"]).contains(r#"href="/about""#));
    assert_eq!(summary.host_dir, dir.path().join("h.test"));
}

#[tokio::test]
async fn rerun_produces_identical_output() {
    let dir = TempDir::new().unwrap();
    let config = config(dir.path(), 50);

    mirror_with_driver(&mut site_graph(), &config).await.unwrap();
    let first = snapshot(dir.path());
    mirror_with_driver(&mut site_graph(), &config).await.unwrap();
    let second = snapshot(dir.path());

    assert_eq!(first.len(), 5);
    assert_eq!(first, second);
}

#[tokio::test]
async fn same_origin_assets_are_captured_during_navigation() {
    let dir = TempDir::new().unwrap();
    let config = config(dir.path(), 50);
    let page = FakePage::linking(&[]).with_assets(vec![
        FakeAsset::new(url("/wp-content/themes/t/style.css?ver=6.4"), 200, "text/css", b"body{}"),
        FakeAsset::new(url("/wp-content/uploads/photo"), 200, "image/jpeg", b"jpeg"),
        FakeAsset::new(url("/fonts/a.woff2"), 200, "font/woff2", b"font"),
        FakeAsset::new(url("/wp-content/missing.png"), 404, "image/png", b"nope"),
        FakeAsset::new("https://cdn.test/lib.js", 200, "application/javascript", b"cdn"),
        FakeAsset::new(url("/wp-json/wp/v2/posts"), 200, "application/json", b"[]"),
    ]);
    let mut driver = FakeDriver::with_pages(vec![("/", page)]);

    let summary = mirror_with_driver(&mut driver, &config).await.unwrap();

    let files = snapshot(dir.path());
    assert_eq!(files["h.test/wp-content/themes/t/style.css"], b"body{}");
    assert_eq!(files["h.test/wp-content/uploads/photo.jpg"], b"jpeg");
    assert_eq!(files["h.test/fonts/a.woff2"], b"font");
    assert!(!files.contains_key("h.test/wp-content/missing.png"));
    assert!(!files.keys().any(|k| k.starts_with("cdn.test")));
    assert!(!files.keys().any(|k| k.contains("wp-json")));
    assert_eq!(summary.assets_saved, 3);
    assert_eq!(summary.assets_failed, 0);
}

#[tokio::test]
async fn driver_is_closed_after_the_run() {
    let dir = TempDir::new().unwrap();
    let config = config(dir.path(), 1);
    let mut driver = FakeDriver::infinite_pagination();

    mirror_with_driver(&mut driver, &config).await.unwrap();

    assert_eq!(driver.close_calls, 1);
}

#[tokio::test]
async fn engine_can_run_without_closing_the_driver() {
    let dir = TempDir::new().unwrap();
    let config = config(dir.path(), 2);
    let mut driver = site_graph();

    let summary = CrawlEngine::new(&mut driver, &config).unwrap().run().await;

    assert_eq!(summary.pages_saved(), 2);
    assert_eq!(driver.close_calls, 0);
}

#[tokio::test]
async fn driver_is_closed_when_the_crawl_cannot_start() {
    let dir = TempDir::new().unwrap();
    let mut json = serde_json::to_value(config(dir.path(), 5)).unwrap();
    json["start_url"] = serde_json::Value::from("ftp://h.test/");
    let config: MirrorConfig = serde_json::from_value(json).unwrap();
    let mut driver = site_graph();

    let result = mirror_with_driver(&mut driver, &config).await;

    assert!(result.is_err());
    assert!(driver.navigations.is_empty());
    assert_eq!(driver.close_calls, 1);
}

#[tokio::test]
async fn zero_page_budget_saves_nothing() {
    let dir = TempDir::new().unwrap();
    let config = config(dir.path(), 0);
    let mut driver = site_graph();

    let summary = mirror_with_driver(&mut driver, &config).await.unwrap();

    assert_eq!(summary.stop_reason, StopReason::BudgetExhausted);
    assert_eq!(summary.pages_saved(), 0);
    assert!(driver.navigations.is_empty());
    assert!(snapshot(dir.path()).is_empty());
    assert_eq!(driver.close_calls, 1);
}
