use std::collections::HashMap;

use serde_json::Value;

use crate::error::{RdfError, Result};

/// Supplies remote JSON-LD context documents to the expansion algorithm.
///
/// Expansion is synchronous, so loaders hand out documents that were fetched
/// ahead of time. The returned value is the whole document; the caller looks
/// up its `@context` member.
pub trait ContextLoader {
    fn load(&self, url: &str) -> Result<&Value>;
}

/// A loader that knows no documents. Every remote context fails to load.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoLoader;

impl ContextLoader for NoLoader {
    fn load(&self, url: &str) -> Result<&Value> {
        Err(RdfError::context(format!(
            "remote context loading is disabled: {url}"
        )))
    }
}

/// A loader backed by a fixed set of preloaded documents, keyed by URL.
#[derive(Clone, Debug, Default)]
pub struct StaticLoader {
    documents: HashMap<String, Value>,
}

impl StaticLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, url: impl Into<String>, document: Value) {
        self.documents.insert(url.into(), document);
    }

    pub fn with_document(mut self, url: impl Into<String>, document: Value) -> Self {
        self.insert(url, document);
        self
    }

    pub fn contains(&self, url: &str) -> bool {
        self.documents.contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl ContextLoader for StaticLoader {
    fn load(&self, url: &str) -> Result<&Value> {
        self.documents
            .get(url)
            .ok_or_else(|| RdfError::context(format!("context document not loaded: {url}")))
    }
}

/// Collects every context URL referenced by string entries of a `@context`
/// value, without descending into remote documents.
pub fn referenced_context_urls(context: &Value) -> Vec<String> {
    let mut urls = Vec::new();
    collect_urls(context, &mut urls);
    urls
}

fn collect_urls(context: &Value, urls: &mut Vec<String>) {
    match context {
        Value::String(url) => {
            if !urls.contains(url) {
                urls.push(url.clone());
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_urls(item, urls);
            }
        }
        Value::Object(obj) => {
            // Scoped contexts inside term definitions may reference documents too
            for value in obj.values() {
                if let Some(scoped) = value.get("@context") {
                    collect_urls(scoped, urls);
                }
            }
        }
        _ => {}
    }
}
