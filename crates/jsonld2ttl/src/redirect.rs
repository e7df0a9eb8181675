//! Follows HTTP redirects for context URLs by hand, with a fixed hop limit.

use std::time::Duration;

use reqwest::{Client, StatusCode, header};
use tracing::debug;
use url::Url;

use crate::errors::Jsonld2TtlError;

/// Redirects followed before giving up.
pub const MAX_REDIRECTS: usize = 5;
/// Per-request connect timeout.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
/// Per-request read timeout.
pub const READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Accept header for context documents.
pub(crate) const ACCEPT_JSONLD: &str = "application/ld+json, application/json";

/// Creates the HTTP client used for context requests.
///
/// Automatic redirects are disabled; [RedirectResolver] follows them itself.
pub fn create_http_client(user_agent: &str) -> Result<Client, Jsonld2TtlError> {
    reqwest::ClientBuilder::new()
        .redirect(reqwest::redirect::Policy::none())
        .connect_timeout(CONNECT_TIMEOUT)
        .read_timeout(READ_TIMEOUT)
        .user_agent(user_agent)
        .build()
        .map_err(|e| Jsonld2TtlError::Network(format!("Couldn't create HTTP client: {e}")))
}

fn is_redirect(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::MOVED_PERMANENTLY
            | StatusCode::FOUND
            | StatusCode::TEMPORARY_REDIRECT
            | StatusCode::PERMANENT_REDIRECT
    )
}

/// Resolves a URL through a bounded chain of redirects.
#[derive(Clone, Debug)]
pub struct RedirectResolver {
    client: Client,
}

impl RedirectResolver {
    /// The client must not follow redirects on its own, see [create_http_client].
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Returns the final location of `url`.
    ///
    /// 301, 302, 307 and 308 responses are followed, with `Location` resolved
    /// against the current URL. Any other response ends the chain and its
    /// status is not checked here.
    pub async fn resolve(&self, url: &str) -> Result<Url, Jsonld2TtlError> {
        let mut current = Url::parse(url)
            .map_err(|e| Jsonld2TtlError::Network(format!("Invalid URL ({url}): {e}")))?;
        let mut redirects = 0;

        loop {
            let response = self
                .client
                .get(current.clone())
                .header(header::ACCEPT, ACCEPT_JSONLD)
                .send()
                .await
                .map_err(|e| Jsonld2TtlError::Network(format!("GET {current} failed: {e}")))?;

            let status = response.status();
            if !is_redirect(status) {
                return Ok(current);
            }
            if redirects == MAX_REDIRECTS {
                return Err(Jsonld2TtlError::TooManyRedirects(url.to_string()));
            }

            let location = response
                .headers()
                .get(header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .ok_or_else(|| Jsonld2TtlError::MalformedRedirect(url.to_string()))?;
            let next = current
                .join(location)
                .map_err(|_| Jsonld2TtlError::MalformedRedirect(url.to_string()))?;

            debug!("redirect ({status}) {current} -> {next}");
            current = next;
            redirects += 1;
        }
    }
}
