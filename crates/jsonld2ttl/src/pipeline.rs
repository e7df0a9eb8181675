//! The conversion pipeline: enhance, resolve namespaces, parse, scan, prune,
//! serialize.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;
use std::sync::Arc;

use futures_util::future::join_all;
use jsonld2ttl_rdf::{
    Graph, PrefixMap, StaticLoader, parse_jsonld, referenced_context_urls, serialize_turtle,
};
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, warn};

use crate::cache::NamespaceCache;
use crate::config::ConverterConfig;
use crate::enhance::{ContextEntry, enhance};
use crate::errors::Jsonld2TtlError;
use crate::extractor::NamespaceExtractor;
use crate::fetcher::ContextFetcher;
use crate::merge::merge_all;
use crate::redirect::{RedirectResolver, create_http_client};

/// Converts JSON-LD documents to Turtle.
///
/// Holds the namespace cache and the fetched-document memo, so reuse one
/// converter for many documents.
#[derive(Clone)]
pub struct Converter {
    config: ConverterConfig,
    cache: Arc<NamespaceCache>,
    fetcher: ContextFetcher,
    extractor: NamespaceExtractor,
}

impl Converter {
    /// Create a new Converter with configuration generated from
    /// [ConverterConfigBuilder](crate::config::ConverterConfigBuilder).
    pub async fn new(config: ConverterConfig) -> Result<Self, Jsonld2TtlError> {
        let client = create_http_client(&config.user_agent)?;
        let fetcher = ContextFetcher::new(
            RedirectResolver::new(client),
            config.document_cache_capacity,
        );
        let cache = Arc::new(NamespaceCache::new(
            config.cache_path.clone(),
            config.corrupt_cache_policy,
        ));
        let extractor = NamespaceExtractor::new(cache.clone(), fetcher.clone());

        Ok(Self {
            config,
            cache,
            fetcher,
            extractor,
        })
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// The namespace cache, shared with the extractor.
    pub fn cache(&self) -> Arc<NamespaceCache> {
        self.cache.clone()
    }

    /// Converts a JSON-LD file to Turtle.
    pub async fn convert_file(&self, path: impl AsRef<Path>) -> Result<String, Jsonld2TtlError> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Jsonld2TtlError::Io(format!("Couldn't read ({}): {e}", path.display())))?;
        self.convert_str(&text).await
    }

    /// Converts JSON-LD read from `reader` to Turtle.
    pub async fn convert_reader<R>(&self, mut reader: R) -> Result<String, Jsonld2TtlError>
    where
        R: AsyncRead + Unpin,
    {
        let mut text = String::new();
        reader.read_to_string(&mut text).await?;
        self.convert_str(&text).await
    }

    /// Converts a JSON-LD document to Turtle.
    pub async fn convert_str(&self, jsonld: &str) -> Result<String, Jsonld2TtlError> {
        let placeholder = self.config.uncontextualized_namespace.as_str();

        let enhanced = enhance(jsonld, placeholder)?;
        let prefixes = self.resolve_namespaces(&enhanced.original_entries).await;
        debug!("merged {} namespace prefixes", prefixes.len());

        let document: Value = serde_json::from_str(&enhanced.text)
            .map_err(|e| Jsonld2TtlError::DocumentParse(e.to_string()))?;
        let loader = self.preload_contexts(&document).await;
        let mut graph = parse_jsonld(&enhanced.text, &prefixes, &loader)?;
        debug!("parsed {} triples", graph.len());

        let terms = graph.term_strings();
        let unmapped = uncontextualized_terms(&terms, placeholder);
        if unmapped.is_empty() {
            graph.prefixes.retain(|_, ns| ns != placeholder);
        } else {
            warn!(
                "{} field(s) have no context mapping and use the placeholder namespace ({placeholder}): {}",
                unmapped.len(),
                unmapped.join(", ")
            );
        }
        prune_unused_prefixes(&mut graph, &terms);

        let turtle = serialize_turtle(&graph)?;
        Ok(apply_type_shorthand(&turtle))
    }

    /// Extracts every URL entry concurrently and merges the results in entry
    /// order. Failed entries are logged and skipped.
    async fn resolve_namespaces(&self, entries: &[ContextEntry]) -> PrefixMap {
        let urls: Vec<&str> = entries.iter().filter_map(ContextEntry::url).collect();
        let results = join_all(urls.iter().map(|url| self.extractor.extract(url))).await;

        let maps: Vec<PrefixMap> = urls
            .iter()
            .zip(results)
            .filter_map(|(url, result)| match result {
                Ok(prefixes) => Some(prefixes),
                Err(e) => {
                    warn!("skipping namespaces of context ({url}): {e}");
                    None
                }
            })
            .collect();

        merge_all(&maps)
    }

    /// Fetches every remote context the document refers to, including those
    /// referenced by other remote contexts, for the expansion to use.
    ///
    /// A context that can't be fetched is left out; expansion then fails on
    /// it.
    async fn preload_contexts(&self, document: &Value) -> StaticLoader {
        let mut loader = StaticLoader::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut pending = document_context_urls(document);

        while !pending.is_empty() {
            pending.retain(|url| seen.insert(url.clone()));
            let fetched = join_all(pending.iter().map(|url| self.fetcher.fetch_json(url))).await;

            let mut next = Vec::new();
            for (url, result) in pending.drain(..).zip(fetched) {
                match result {
                    Ok(doc) => {
                        if let Some(ctx) = doc.get("@context") {
                            next.extend(referenced_context_urls(ctx));
                        }
                        loader.insert(url, doc);
                    }
                    Err(e) => warn!("couldn't load context ({url}): {e}"),
                }
            }
            pending = next;
        }

        loader
    }
}

/// Context URLs used anywhere in a document, in document order.
fn document_context_urls(document: &Value) -> Vec<String> {
    let mut urls = Vec::new();
    collect_context_urls(document, &mut urls);
    urls
}

fn collect_context_urls(value: &Value, urls: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                if key == "@context" {
                    for url in referenced_context_urls(child) {
                        if !urls.contains(&url) {
                            urls.push(url);
                        }
                    }
                } else {
                    collect_context_urls(child, urls);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_context_urls(item, urls);
            }
        }
        _ => {}
    }
}

/// Terms in the placeholder namespace, sorted.
pub fn uncontextualized_terms(terms: &BTreeSet<String>, placeholder: &str) -> Vec<String> {
    terms
        .iter()
        .filter(|t| t.starts_with(placeholder))
        .cloned()
        .collect()
}

/// Drops prefix declarations whose namespace starts none of `terms`.
pub fn prune_unused_prefixes(graph: &mut Graph, terms: &BTreeSet<String>) {
    graph
        .prefixes
        .retain(|_, ns| terms.iter().any(|t| t.starts_with(ns)));
}

/// Rewrites `rdf:type` predicates to the Turtle keyword `a`.
pub fn apply_type_shorthand(turtle: &str) -> String {
    turtle.replace(" rdf:type ", " a ")
}
