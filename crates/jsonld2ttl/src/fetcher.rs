//! Fetches remote context documents through the [RedirectResolver].

use std::sync::Arc;

use moka::future::Cache;
use reqwest::header;
use serde_json::Value;
use tracing::debug;

use crate::errors::Jsonld2TtlError;
use crate::redirect::{ACCEPT_JSONLD, RedirectResolver};

/// Downloads context documents and keeps them in memory for the lifetime of
/// the fetcher, so one conversion never requests the same URL twice.
#[derive(Clone)]
pub struct ContextFetcher {
    resolver: RedirectResolver,
    documents: Cache<String, Arc<Vec<u8>>>,
}

impl ContextFetcher {
    pub fn new(resolver: RedirectResolver, capacity: u64) -> Self {
        Self {
            resolver,
            documents: Cache::builder().max_capacity(capacity).build(),
        }
    }

    /// Returns the raw bytes of the document at `url`, following redirects.
    ///
    /// HTTP error statuses at the final location are a
    /// [Network](Jsonld2TtlError::Network) error.
    pub async fn fetch(&self, url: &str) -> Result<Arc<Vec<u8>>, Jsonld2TtlError> {
        if let Some(bytes) = self.documents.get(url).await {
            debug!("context ({url}) found in document cache");
            return Ok(bytes);
        }

        let final_url = self.resolver.resolve(url).await?;
        debug!("fetching context ({url}) from ({final_url})");

        let response = self
            .resolver
            .client()
            .get(final_url.clone())
            .header(header::ACCEPT, ACCEPT_JSONLD)
            .send()
            .await
            .map_err(|e| Jsonld2TtlError::Network(format!("GET {final_url} failed: {e}")))?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(Jsonld2TtlError::Network(format!(
                "GET {final_url} returned {status}"
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Jsonld2TtlError::Network(format!("Couldn't read body of {final_url}: {e}")))?;

        let bytes = Arc::new(bytes.to_vec());
        self.documents.insert(url.to_string(), bytes.clone()).await;
        Ok(bytes)
    }

    /// Fetches `url` and parses it as JSON.
    pub async fn fetch_json(&self, url: &str) -> Result<Value, Jsonld2TtlError> {
        let bytes = self.fetch(url).await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| Jsonld2TtlError::RemoteContextParse(format!("{url}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::redirect::create_http_client;
    use wiremock::matchers::{header as header_matcher, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher() -> ContextFetcher {
        let client = create_http_client("jsonld2ttl-test").unwrap();
        ContextFetcher::new(RedirectResolver::new(client), 10)
    }

    #[tokio::test]
    async fn fetches_once_per_url() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ctx"))
            .and(header_matcher("Accept", ACCEPT_JSONLD))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"@context": {}}"#))
            // One request from the resolver, one for the body
            .expect(2)
            .mount(&server)
            .await;

        let fetcher = fetcher();
        let url = format!("{}/ctx", server.uri());
        let first = fetcher.fetch_json(&url).await.unwrap();
        let second = fetcher.fetch_json(&url).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn error_status_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = fetcher()
            .fetch(&format!("{}/missing", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, Jsonld2TtlError::Network(msg) if msg.contains("404")));
    }

    #[tokio::test]
    async fn invalid_json_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/html"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let err = fetcher()
            .fetch_json(&format!("{}/html", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, Jsonld2TtlError::RemoteContextParse(_)));
    }
}
