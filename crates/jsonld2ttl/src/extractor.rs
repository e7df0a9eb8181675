//! Context URL -> prefix map, through the [NamespaceCache].

use std::sync::Arc;

use jsonld2ttl_rdf::{PrefixMap, context_document_prefixes};
use tracing::debug;

use crate::cache::NamespaceCache;
use crate::errors::Jsonld2TtlError;
use crate::fetcher::ContextFetcher;

#[derive(Clone)]
pub struct NamespaceExtractor {
    cache: Arc<NamespaceCache>,
    fetcher: ContextFetcher,
}

impl NamespaceExtractor {
    pub fn new(cache: Arc<NamespaceCache>, fetcher: ContextFetcher) -> Self {
        Self { cache, fetcher }
    }

    /// Returns the prefixes declared by the context document at `context_url`.
    ///
    /// A cached result is returned without network access. Otherwise the
    /// document is fetched, its prefixes are read and the result is cached.
    pub async fn extract(&self, context_url: &str) -> Result<PrefixMap, Jsonld2TtlError> {
        if let Some(prefixes) = self.cache.get(context_url).await? {
            debug!("namespace cache hit for ({context_url})");
            return Ok(prefixes);
        }
        debug!("namespace cache miss for ({context_url})");

        let bytes = self.fetcher.fetch(context_url).await?;
        let prefixes = context_document_prefixes(&bytes).map_err(|e| {
            Jsonld2TtlError::RemoteContextParse(format!("{context_url}: {e}"))
        })?;

        self.cache.put(context_url, prefixes.clone()).await?;
        Ok(prefixes)
    }
}
