use serde_json::Value;

use super::context::is_absolute_iri;
use crate::error::{RdfError, Result};
use crate::prefix::{PrefixMap, is_valid_prefix_name};

/// Reads the namespace prefixes a JSON-LD context document declares.
///
/// `bytes` is a whole context document such as
/// `{"@context": {"foaf": "http://xmlns.com/foaf/0.1/", ...}}`. Remote
/// contexts it references are not followed.
pub fn context_document_prefixes(bytes: &[u8]) -> Result<PrefixMap> {
    let document: Value = serde_json::from_slice(bytes)?;
    let context = document
        .get("@context")
        .ok_or_else(|| RdfError::context("context document has no @context member"))?;
    Ok(context_prefixes(context))
}

/// Collects prefix declarations from a `@context` value, in document order.
///
/// A term declares a prefix when its key is a usable prefix name and either
/// its IRI (the string value or its `@id`) is absolute and ends in `/` or `#`,
/// or its expanded definition carries `"@prefix": true`.
pub fn context_prefixes(context: &Value) -> PrefixMap {
    let mut prefixes = PrefixMap::new();
    collect(context, &mut prefixes);
    prefixes
}

fn collect(context: &Value, prefixes: &mut PrefixMap) {
    match context {
        Value::Array(items) => {
            for item in items {
                collect(item, prefixes);
            }
        }
        Value::Object(terms) => {
            for (term, definition) in terms {
                if term.starts_with('@') || !is_valid_prefix_name(term) {
                    continue;
                }
                if let Some(namespace) = prefix_namespace(definition) {
                    prefixes.insert(term.as_str(), namespace);
                }
            }
        }
        _ => {}
    }
}

fn prefix_namespace(definition: &Value) -> Option<&str> {
    let (iri, flag) = match definition {
        Value::String(iri) => (iri.as_str(), None),
        Value::Object(obj) => (
            obj.get("@id")?.as_str()?,
            obj.get("@prefix").and_then(Value::as_bool),
        ),
        _ => return None,
    };
    if !is_absolute_iri(iri) {
        return None;
    }
    match flag {
        Some(declared) => declared.then_some(iri),
        None => (iri.ends_with('/') || iri.ends_with('#')).then_some(iri),
    }
}
