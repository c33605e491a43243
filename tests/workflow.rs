use std::error::Error;
use std::path::Path;
use std::time::{Duration, Instant};

use pma_table_scraper::{
    ExtractionError, ScrapeError, Session, Settings, TableScraper, run, write_report,
};
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LOGIN_PAGE: &str = r#"<html><body>
<form method="post" action="index.php?route=/" class="login">
  <input type="text" name="pma_username" id="input_username">
  <input type="password" name="pma_password" id="input_password">
  <input type="hidden" name="server" value="1">
  <input type="hidden" name="token" value="abc123">
</form>
</body></html>"#;

const QUERY_PAGE: &str = r#"<html><body>
<div class="result_query"><div class="alert alert-success">Showing rows 0 - 0</div></div>
<table class="table data table_results">
  <tr><th></th><th>ID</th><th>Name</th></tr>
  <tr>
    <td><input type="checkbox" name="rows_to_delete[0]"></td>
    <td><a href="sql.php">Edit</a></td>
    <td><a href="sql.php">Copy</a></td>
    <td><a href="sql.php">Delete</a></td>
    <td>7</td>
    <td>Widget</td>
  </tr>
</table>
</body></html>"#;

async fn mount_login(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "phpMyAdmin=session-1; Path=/")
                .set_body_string(LOGIN_PAGE),
        )
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/index.php"))
        .and(body_string_contains("pma_username=root"))
        .and(body_string_contains("pma_password=secret"))
        .and(body_string_contains("server=1"))
        .and(body_string_contains("token=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>home</html>"))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/index.php"))
        .and(query_param("route", "/database/structure"))
        .and(query_param("db", "shop"))
        .and(query_param("token", "abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>structure</html>"))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_query(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/index.php"))
        .and(query_param("route", "/sql"))
        .and(query_param("db", "shop"))
        .and(query_param("table", "widgets"))
        .and(query_param("token", "abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(server)
        .await;
}

fn settings(server: &MockServer, output: &Path) -> Settings {
    paced_settings(server, output, 0.0)
}

fn paced_settings(server: &MockServer, output: &Path, base_delay: f64) -> Settings {
    Settings::builder()
        .base_url(format!("{}/", server.uri()))
        .credentials("root", "secret")
        .target("shop", "widgets")
        .base_delay(base_delay)
        .delay_multiplier(0.0)
        .output_path(output)
        .build()
        .expect("valid settings")
}

#[tokio::test]
async fn exports_scraped_table() -> Result<(), Box<dyn Error>> {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_query(&server, QUERY_PAGE).await;

    let dir = tempfile::tempdir()?;
    let output = dir.path().join("result.csv");

    let table = run(settings(&server, &output)).await?;
    assert_eq!(table.headers, vec!["ID", "Name"]);
    assert_eq!(table.rows, vec![vec!["7", "Widget"]]);

    assert_eq!(std::fs::read_to_string(&output)?, "ID,Name\n7,Widget\n");

    let mut report = Vec::new();
    write_report(&table, &mut report)?;
    assert_eq!(String::from_utf8(report)?, "ID | Name\n7 | Widget\n");
    Ok(())
}

#[tokio::test]
async fn missing_grid_writes_nothing() -> Result<(), Box<dyn Error>> {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_query(
        &server,
        r#"<div class="alert alert-danger">#1146 - Table 'shop.widgets' doesn't exist</div>"#,
    )
    .await;

    let dir = tempfile::tempdir()?;
    let output = dir.path().join("result.csv");

    let err = run(settings(&server, &output)).await.unwrap_err();
    assert!(matches!(
        err,
        ScrapeError::Extraction(ExtractionError::ResultsTableMissing)
    ));
    assert!(!output.exists());
    Ok(())
}

#[tokio::test]
async fn login_page_without_token_never_posts() -> Result<(), Box<dyn Error>> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>no form here</html>"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir()?;
    let output = dir.path().join("result.csv");

    let err = run(settings(&server, &output)).await.unwrap_err();
    assert!(matches!(
        err,
        ScrapeError::Extraction(ExtractionError::TokenInputMissing)
    ));
    assert!(!output.exists());
    Ok(())
}

#[tokio::test]
async fn scrape_leaves_output_untouched() -> Result<(), Box<dyn Error>> {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_query(&server, QUERY_PAGE).await;

    let dir = tempfile::tempdir()?;
    let output = dir.path().join("result.csv");

    let scraper = TableScraper::new(settings(&server, &output))?;
    let first = scraper.scrape().await?;
    assert_eq!(first.headers, vec!["ID", "Name"]);
    assert!(!output.exists());
    Ok(())
}

#[tokio::test]
async fn requests_go_out_in_order_with_pauses_between() -> Result<(), Box<dyn Error>> {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_query(&server, QUERY_PAGE).await;

    let dir = tempfile::tempdir()?;
    let output = dir.path().join("result.csv");

    let started = Instant::now();
    run(paced_settings(&server, &output, 0.05)).await?;
    // Pauses before the login POST, the structure GET and the table GET.
    assert!(started.elapsed() >= Duration::from_millis(150));

    let requests = server.received_requests().await.expect("recording enabled");
    let sequence: Vec<(String, String, Option<String>)> = requests
        .iter()
        .map(|request| {
            let route = request
                .url
                .query_pairs()
                .find(|(key, _)| key == "route")
                .map(|(_, value)| value.into_owned());
            (request.method.to_string(), request.url.path().to_string(), route)
        })
        .collect();
    assert_eq!(
        sequence,
        vec![
            ("GET".to_string(), "/".to_string(), None),
            ("POST".to_string(), "/index.php".to_string(), None),
            (
                "GET".to_string(),
                "/index.php".to_string(),
                Some("/database/structure".to_string()),
            ),
            ("GET".to_string(), "/index.php".to_string(), Some("/sql".to_string())),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn custom_client_carries_the_whole_run() -> Result<(), Box<dyn Error>> {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_query(&server, QUERY_PAGE).await;

    let dir = tempfile::tempdir()?;
    let output = dir.path().join("result.csv");

    let client = reqwest::Client::builder()
        .cookie_store(true)
        .user_agent("table-export-check/1.0")
        .build()?;
    let scraper =
        TableScraper::with_session(settings(&server, &output), Session::from_client(client));
    let table = scraper.scrape().await?;
    assert_eq!(table.rows, vec![vec!["7", "Widget"]]);

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 4);
    for request in &requests {
        let agent = request
            .headers
            .get("user-agent")
            .and_then(|value| value.to_str().ok());
        assert_eq!(agent, Some("table-export-check/1.0"));
    }
    Ok(())
}
