pub mod context;
pub mod expand;
pub mod loader;
pub mod prefixes;
pub mod to_rdf;

use serde_json::Value;

use crate::error::{RdfError, Result};
use crate::model::Graph;
use crate::prefix::PrefixMap;
use loader::ContextLoader;

pub use prefixes::{context_document_prefixes, context_prefixes};

/// Expand a JSON-LD document and convert it to an RDF graph.
///
/// This is the main entry point for the JSON-LD module. It:
/// 1. Processes the `@context` and expands all terms to full IRIs
/// 2. Converts the expanded JSON-LD to RDF triples
pub fn expand_and_to_rdf(document: &Value, loader: &dyn ContextLoader) -> Result<Graph> {
    let expanded = expand::expand_document(document, loader)?;
    tracing::debug!(expanded = %expanded, "JSON-LD expanded form");
    to_rdf::to_rdf(&expanded)
}

/// Parse JSON-LD text into a graph carrying `prefixes`.
///
/// When the document's top-level context sets `@vocab` to a namespace no
/// prefix is bound to, that namespace is also attached as the default (empty)
/// prefix so the serializer can abbreviate terms in it.
pub fn parse_jsonld(text: &str, prefixes: &PrefixMap, loader: &dyn ContextLoader) -> Result<Graph> {
    let document: Value = serde_json::from_str(text)?;
    if !document.is_object() && !document.is_array() {
        return Err(RdfError::json("JSON-LD document must be an object or an array"));
    }

    let mut graph = expand_and_to_rdf(&document, loader)?;
    graph.prefixes = prefixes.clone();

    if document.is_object()
        && let Some(vocab) = expand::top_level_context(&document, loader)?.vocab
        && !prefixes.contains_namespace(&vocab)
        && !prefixes.contains_prefix("")
    {
        graph.prefixes.insert("", vocab);
    }

    Ok(graph)
}
