//! Panel login.

use std::fmt;

use url::Url;

use crate::config::Credentials;
use crate::extract::extract_token;
use crate::pacing::Pacing;
use crate::scrape::ScrapeResult;
use crate::session::Session;

/// Server index posted with the login form.
pub const SERVER_ID: &str = "1";

/// CSRF token issued by the login page and echoed on every later request.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(***)")
    }
}

/// Loads the login page, extracts the token and posts the credentials.
///
/// The POST response is not inspected: a rejected login still returns the
/// token, and the failure shows up when the table page has no grid.
pub async fn authenticate(
    session: &Session,
    base_url: &Url,
    credentials: &Credentials,
    pacing: &Pacing,
) -> ScrapeResult<Token> {
    let login_page = session.get(base_url.clone()).await?;
    let token = Token::new(extract_token(login_page.body())?);
    log::debug!("login token captured from {}", login_page.url());

    pacing.pause().await;

    let form = [
        ("pma_username", credentials.login.as_str()),
        ("pma_password", credentials.password.as_str()),
        ("server", SERVER_ID),
        ("token", token.as_str()),
    ];
    let response = session.post_form(base_url.join("index.php")?, &form).await?;
    log::info!("login form posted as {:?} (status {})", credentials.login, response.status());

    Ok(token)
}
