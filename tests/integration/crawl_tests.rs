//! End-to-end crawl tests against mock HTTP servers

use offprint::config::Config;
use offprint::crawler::Coordinator;
use offprint::output::load_metadata;
use offprint::{CrawlError, FetchError};
use std::io::Write;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Test configuration with fast backoff so retry tests finish quickly
fn test_config() -> Config {
    let mut config = Config::default();
    config.fetch.backoff_base_ms = 10;
    config
}

/// Listing page with three articles: one plain PDF link, one root-relative
/// link served as DOCX, and one with no download link at all. The third
/// article also has no abstract and no author line, exercising default fill.
fn listing_page_html() -> String {
    r#"<html><head><title>Volume 12</title></head><body>
    <div class="topic"></div>
    <div class="topic">Soil pH Effects</div>
    <div class="article_type">Original Research</div>
    <div class="pages">1-10</div>
    <div class="authors">A. Adeyemi, B. Okafor</div>
    <div class="download"><a href="files/soil.pdf">Download</a></div>
    <input type="hidden" id="abs1" value="&lt;p&gt;Soil   acidity&lt;/p&gt;   affects   yield">

    <div class="topic">Nitrogen Study</div>
    <div class="article_type">Review</div>
    <div class="pages">11-24</div>
    <div class="authors">C. Eze</div>
    <div class="download"><a href="/files/nitrogen.pdf">Download</a></div>
    <input type="hidden" id="abs2" value="Nitrogen uptake in maize">

    <div class="topic">Cassava Yield</div>
    <div class="download"><span>Not yet available</span></div>
    </body></html>"#
        .to_string()
}

/// A minimal real DOCX built in memory, with a keyword block and an email
fn docx_bytes() -> Vec<u8> {
    let document_xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:body>
<w:p><w:r><w:t>Keywords: soil, nitrogen, pH</w:t></w:r></w:p>
<w:p><w:r><w:t></w:t></w:r></w:p>
<w:p><w:r><w:t>Abstract: corresponding author c.eze@uni.edu.ng</w:t></w:r></w:p>
</w:body></w:document>"#;

    let cursor = std::io::Cursor::new(Vec::new());
    let mut writer = zip::ZipWriter::new(cursor);
    let options = zip::write::FileOptions::default();
    writer.start_file("word/document.xml", options).unwrap();
    writer.write_all(document_xml.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}

async fn mount_listing_page(server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

fn coordinator_for(
    server: &MockServer,
    page_path: &str,
    output_dir: &std::path::Path,
) -> Coordinator {
    let url = Url::parse(&format!("{}{}", server.uri(), page_path)).unwrap();
    Coordinator::new(test_config(), url, output_dir.to_path_buf()).unwrap()
}

#[tokio::test]
async fn test_full_crawl_happy_path() {
    let server = MockServer::start().await;
    mount_listing_page(&server, "/volumes/vol-12.php", listing_page_html()).await;

    // Plain PDF; the relative href resolves against the page directory
    Mock::given(method("GET"))
        .and(path("/volumes/files/soil.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"%PDF-1.4 fake body".to_vec())
                .insert_header("content-type", "application/pdf"),
        )
        .mount(&server)
        .await;

    // DOCX served from a .pdf URL: the content-type must win
    Mock::given(method("GET"))
        .and(path("/files/nitrogen.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(docx_bytes())
                .insert_header(
                    "content-type",
                    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
                ),
        )
        .mount(&server)
        .await;

    let output_dir = tempfile::tempdir().unwrap();
    let coordinator = coordinator_for(&server, "/volumes/vol-12.php", output_dir.path());
    let report = coordinator.run().await.expect("crawl failed");

    // The decorative empty topic is dropped; three real articles remain
    assert_eq!(report.articles_found, 3);
    assert_eq!(report.tasks_submitted, 2);
    assert_eq!(report.downloads_succeeded, 2);
    assert_eq!(report.downloads_failed, 0);
    assert_eq!(report.files_mined, 2);
    assert_eq!(report.pdf_count, 1);
    assert_eq!(report.docx_count, 1);

    // The linkless article is enumerated, not just counted
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].title, "Cassava Yield");

    // Files land under index-prefixed sanitized names
    let pdf_path = output_dir.path().join("01-Soil_pH_Effects.pdf");
    let docx_path = output_dir.path().join("02-Nitrogen_Study.docx");
    assert!(pdf_path.exists());
    assert!(docx_path.exists(), "content-type should rewrite to .docx");
    assert_eq!(std::fs::read(&pdf_path).unwrap(), b"%PDF-1.4 fake body");

    // Page source debug copy
    assert!(output_dir.path().join("page_source.html").exists());

    // Serialized records
    let records = load_metadata(&output_dir.path().join("metadata.json")).unwrap();
    assert_eq!(records.len(), 3);

    assert_eq!(records[0].title, "Soil pH Effects");
    assert_eq!(records[0].page_number, "1-10");
    assert_eq!(records[0].authors, "A. Adeyemi, B. Okafor");
    assert_eq!(records[0].abstract_text, "Soil acidity affects yield");
    assert!(records[0].file_path.ends_with("01-Soil_pH_Effects.pdf"));
    // The fake PDF body is unparseable; mining degrades to empty fields
    assert_eq!(records[0].keywords, "");

    assert!(records[1].file_path.ends_with("02-Nitrogen_Study.docx"));
    assert_eq!(records[1].keywords, "soil, nitrogen, pH");
    assert_eq!(records[1].email, "c.eze@uni.edu.ng");

    // Linkless record: provisional path, defaults everywhere
    assert_eq!(records[2].title, "Cassava Yield");
    assert_eq!(records[2].page_number, "");
    assert_eq!(records[2].authors, "");
    assert_eq!(records[2].abstract_text, "");
    assert!(records[2].file_path.ends_with("03-Cassava_Yield.pdf"));
    assert!(!output_dir.path().join("03-Cassava_Yield.pdf").exists());
}

#[tokio::test]
async fn test_page_fetch_retried_on_transient_error() {
    let server = MockServer::start().await;

    // First response is a 503; the retry gets the real page
    Mock::given(method("GET"))
        .and(path("/list.php"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_listing_page(&server, "/list.php", listing_page_html()).await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let output_dir = tempfile::tempdir().unwrap();
    let coordinator = coordinator_for(&server, "/list.php", output_dir.path());
    let report = coordinator.run().await.expect("retry should recover the page");

    assert_eq!(report.articles_found, 3);
}

#[tokio::test]
async fn test_page_fetch_http_error_aborts_run() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gone.php"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let output_dir = tempfile::tempdir().unwrap();
    let coordinator = coordinator_for(&server, "/gone.php", output_dir.path());

    match coordinator.run().await {
        Err(CrawlError::PageFetch(FetchError::Http { status, .. })) => assert_eq!(status, 404),
        other => panic!("expected HTTP fetch error, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_page_without_topics_aborts_run() {
    let server = MockServer::start().await;
    mount_listing_page(
        &server,
        "/empty.php",
        "<html><body><p>No articles here</p></body></html>".to_string(),
    )
    .await;

    let output_dir = tempfile::tempdir().unwrap();
    let coordinator = coordinator_for(&server, "/empty.php", output_dir.path());

    assert!(matches!(
        coordinator.run().await,
        Err(CrawlError::NoArticles { .. })
    ));
}

#[tokio::test]
async fn test_download_failure_keeps_record_and_other_downloads() {
    let server = MockServer::start().await;

    let html = r#"<html><body>
        <div class="topic">Working Article</div>
        <div class="download"><a href="/files/ok.pdf">Download</a></div>
        <div class="topic">Broken Article</div>
        <div class="download"><a href="/files/missing.pdf">Download</a></div>
        </body></html>"#;
    mount_listing_page(&server, "/list.php", html.to_string()).await;

    Mock::given(method("GET"))
        .and(path("/files/ok.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"%PDF-1.4 ok".to_vec())
                .insert_header("content-type", "application/pdf"),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/files/missing.pdf"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let output_dir = tempfile::tempdir().unwrap();
    let coordinator = coordinator_for(&server, "/list.php", output_dir.path());
    let report = coordinator.run().await.expect("one bad link must not abort the run");

    assert_eq!(report.articles_found, 2);
    assert_eq!(report.downloads_succeeded, 1);
    assert_eq!(report.downloads_failed, 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].title, "Broken Article");

    let records = load_metadata(&output_dir.path().join("metadata.json")).unwrap();
    assert_eq!(records.len(), 2);
    // Failed download keeps the provisional path and empty mined fields
    assert!(records[1].file_path.ends_with("02-Broken_Article.pdf"));
    assert_eq!(records[1].keywords, "");
    assert_eq!(records[1].email, "");
}

#[tokio::test]
async fn test_misaligned_fixture_page_fills_defaults() {
    let server = MockServer::start().await;

    // Three topics, but only one of each supporting fragment
    let html = r#"<html><body>
        <div class="topic">Alpha</div>
        <div class="topic">Beta</div>
        <div class="topic">Gamma</div>
        <div class="article_type">Original Research</div>
        <div class="pages">1-5</div>
        <div class="authors">Solo Author</div>
        <input type="hidden" id="abs1" value="Only abstract">
        </body></html>"#;
    mount_listing_page(&server, "/short.php", html.to_string()).await;

    let output_dir = tempfile::tempdir().unwrap();
    let coordinator = coordinator_for(&server, "/short.php", output_dir.path());
    let report = coordinator.run().await.expect("short lists are warnings, not errors");

    assert_eq!(report.articles_found, 3);
    assert_eq!(report.tasks_submitted, 0);

    let records = load_metadata(&output_dir.path().join("metadata.json")).unwrap();
    assert_eq!(records[0].page_number, "1-5");
    assert_eq!(records[0].abstract_text, "Only abstract");
    assert_eq!(records[1].page_number, "");
    assert_eq!(records[2].authors, "");
}

#[tokio::test]
async fn test_discover_volumes_writes_csv() {
    let server = MockServer::start().await;

    let html = r#"<html><body>
        <a href="about.php">About</a>
        <a href="volume-list.php?volume=12 (2024)">Volume 12</a>
        <a href="volume-list.php?volume=11 (2023)">Volume 11</a>
        </body></html>"#;
    mount_listing_page(&server, "/view-articles.php", html.to_string()).await;

    let output_dir = tempfile::tempdir().unwrap();
    let coordinator = coordinator_for(&server, "/view-articles.php", output_dir.path());
    let csv_path = coordinator.discover_volumes().await.unwrap();

    let content = std::fs::read_to_string(&csv_path).unwrap();
    let mut lines = content.lines();
    assert_eq!(lines.next(), Some("url,volume-issue"));
    assert_eq!(content.lines().count(), 3);
    assert!(content.contains("volume12-2024"));
    assert!(content.contains("volume11-2023"));
}
