//! Cookie-carrying HTTP session shared by the login and table requests.

use std::time::Instant;

use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use reqwest::{Client, Method};
use url::Url;

use crate::scrape::ScrapeResult;

/// User-Agent sent with every request.
pub const USER_AGENT: &str = concat!("pma-table-scraper/", env!("CARGO_PKG_VERSION"));

/// Body and metadata of a fetched page.
#[derive(Debug, Clone)]
pub struct PageResponse {
    status: u16,
    url: Url,
    body: String,
}

impl PageResponse {
    /// HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Final URL after redirects.
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn into_body(self) -> String {
        self.body
    }
}

/// Authenticated client state. Cookies set by the panel are kept for the
/// lifetime of the session and replayed on every request.
#[derive(Debug, Clone)]
pub struct Session {
    client: Client,
}

impl Session {
    pub fn new() -> ScrapeResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = Client::builder()
            .cookie_store(true)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self { client })
    }

    /// Wrap an existing client. It should have a cookie store enabled,
    /// otherwise the login will not carry over to later requests.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    pub async fn get(&self, url: Url) -> ScrapeResult<PageResponse> {
        self.send(Method::GET, url, None).await
    }

    /// POST an `application/x-www-form-urlencoded` body.
    pub async fn post_form(&self, url: Url, fields: &[(&str, &str)]) -> ScrapeResult<PageResponse> {
        self.send(Method::POST, url, Some(fields)).await
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        form: Option<&[(&str, &str)]>,
    ) -> ScrapeResult<PageResponse> {
        log::debug!("-> {} {}", method, redact_token(&url));

        let mut builder = self.client.request(method.clone(), url);
        if let Some(fields) = form {
            builder = builder.form(fields);
        }

        let started = Instant::now();
        let response = builder.send().await?;
        let latency = started.elapsed();

        let status = response.status();
        let final_url = response.url().clone();
        let body = response.text().await?;

        log::debug!(
            "<- {} {} -> {} ({:.2}s)",
            method,
            redact_token(&final_url),
            status.as_u16(),
            latency.as_secs_f64()
        );
        if status.is_client_error() || status.is_server_error() {
            log::warn!("{} {} returned {}", method, redact_token(&final_url), status);
        }

        Ok(PageResponse {
            status: status.as_u16(),
            url: final_url,
            body,
        })
    }
}

fn redact_token(url: &Url) -> String {
    if !url.query_pairs().any(|(key, _)| key == "token") {
        return url.to_string();
    }
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| {
            let value = if key == "token" { "***".to_string() } else { value.into_owned() };
            (key.into_owned(), value)
        })
        .collect();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}
