//! Adds a placeholder `@vocab` to documents whose context declares none, so
//! unmapped fields become triples instead of being dropped.

use serde_json::{Map, Value, json};

use crate::errors::Jsonld2TtlError;

/// One entry of a document's top-level `@context`.
#[derive(Clone, Debug, PartialEq)]
pub enum ContextEntry {
    /// A remote context reference.
    Url(String),
    /// An inline context object.
    Inline(Map<String, Value>),
    /// A `null` array entry, which resets the active context.
    Null,
    /// The document has no `@context`.
    Absent,
}

impl ContextEntry {
    pub fn url(&self) -> Option<&str> {
        match self {
            ContextEntry::Url(url) => Some(url),
            _ => None,
        }
    }

    fn to_value(&self) -> Option<Value> {
        match self {
            ContextEntry::Url(url) => Some(Value::String(url.clone())),
            ContextEntry::Inline(map) => Some(Value::Object(map.clone())),
            ContextEntry::Null => Some(Value::Null),
            ContextEntry::Absent => None,
        }
    }

    /// True if the entry's JSON text mentions `@vocab` anywhere.
    fn mentions_vocab(&self) -> bool {
        match self {
            ContextEntry::Inline(map) => Value::Object(map.clone()).to_string().contains("@vocab"),
            ContextEntry::Url(url) => url.contains("@vocab"),
            ContextEntry::Null | ContextEntry::Absent => false,
        }
    }
}

/// Result of [enhance].
#[derive(Clone, Debug)]
pub struct EnhancedDocument {
    /// The context entries as they were before enhancement.
    pub original_entries: Vec<ContextEntry>,
    /// The document, pretty-printed, with the placeholder `@vocab` added when needed.
    pub text: String,
}

/// Normalizes the document's `@context` and appends
/// `{"@vocab": <placeholder>}` unless some entry already mentions `@vocab`.
///
/// The synthetic entry always goes last and existing entries keep their order.
pub fn enhance(document: &str, placeholder: &str) -> Result<EnhancedDocument, Jsonld2TtlError> {
    let parsed: Value = serde_json::from_str(document)
        .map_err(|e| Jsonld2TtlError::DocumentParse(format!("Invalid JSON: {e}")))?;
    let Value::Object(mut root) = parsed else {
        return Err(Jsonld2TtlError::DocumentParse(
            "Top level of a JSON-LD document must be an object".into(),
        ));
    };

    let original_entries = context_entries(root.get("@context"))?;

    if !original_entries.iter().any(ContextEntry::mentions_vocab) {
        let mut context: Vec<Value> = original_entries
            .iter()
            .filter_map(ContextEntry::to_value)
            .collect();
        context.push(json!({"@vocab": placeholder}));

        if root.contains_key("@context") {
            root.insert("@context".into(), Value::Array(context));
        } else {
            // Keep @context at the top for readability
            let mut with_context = Map::with_capacity(root.len() + 1);
            with_context.insert("@context".into(), Value::Array(context));
            with_context.extend(root);
            root = with_context;
        }
    }

    let text = serde_json::to_string_pretty(&Value::Object(root))
        .map_err(|e| Jsonld2TtlError::DocumentParse(format!("Couldn't write document: {e}")))?;

    Ok(EnhancedDocument {
        original_entries,
        text,
    })
}

fn context_entries(context: Option<&Value>) -> Result<Vec<ContextEntry>, Jsonld2TtlError> {
    let entry = |value: &Value| match value {
        Value::String(url) => Ok(ContextEntry::Url(url.clone())),
        Value::Object(map) => Ok(ContextEntry::Inline(map.clone())),
        Value::Null => Ok(ContextEntry::Null),
        other => Err(Jsonld2TtlError::DocumentParse(format!(
            "Invalid @context entry: {other}"
        ))),
    };

    match context {
        None | Some(Value::Null) => Ok(vec![ContextEntry::Absent]),
        Some(Value::Array(items)) => items.iter().map(entry).collect(),
        Some(value) => Ok(vec![entry(value)?]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLACEHOLDER: &str = "urn:example:uncontextualized:";

    fn context_of(text: &str) -> Value {
        let doc: Value = serde_json::from_str(text).unwrap();
        doc["@context"].clone()
    }

    #[test]
    fn string_context_becomes_array() {
        let doc = r#"{"@context": "http://www.w3.org/ns/anno.jsonld", "id": "x"}"#;
        let enhanced = enhance(doc, PLACEHOLDER).unwrap();

        assert_eq!(
            enhanced.original_entries,
            vec![ContextEntry::Url("http://www.w3.org/ns/anno.jsonld".into())]
        );
        assert_eq!(
            context_of(&enhanced.text),
            json!(["http://www.w3.org/ns/anno.jsonld", {"@vocab": PLACEHOLDER}])
        );
    }

    #[test]
    fn object_context_gets_second_entry() {
        let doc = r#"{"@context": {"name": "http://xmlns.com/foaf/0.1/name"}, "name": "A"}"#;
        let enhanced = enhance(doc, PLACEHOLDER).unwrap();
        assert_eq!(
            context_of(&enhanced.text),
            json!([{"name": "http://xmlns.com/foaf/0.1/name"}, {"@vocab": PLACEHOLDER}])
        );
    }

    #[test]
    fn array_context_keeps_order() {
        let doc = r#"{"@context": ["http://a.example/ctx", {"x": "http://x.example/"}, "http://b.example/ctx"]}"#;
        let enhanced = enhance(doc, PLACEHOLDER).unwrap();
        let urls: Vec<&str> = enhanced
            .original_entries
            .iter()
            .filter_map(ContextEntry::url)
            .collect();
        assert_eq!(urls, vec!["http://a.example/ctx", "http://b.example/ctx"]);
        assert_eq!(
            context_of(&enhanced.text),
            json!([
                "http://a.example/ctx",
                {"x": "http://x.example/"},
                "http://b.example/ctx",
                {"@vocab": PLACEHOLDER}
            ])
        );
    }

    #[test]
    fn null_entries_are_kept() {
        let doc = r#"{"@context": [{"name": "http://a.example/name"}, null, {"title": "http://a.example/title"}]}"#;
        let enhanced = enhance(doc, PLACEHOLDER).unwrap();
        assert_eq!(enhanced.original_entries[1], ContextEntry::Null);
        assert_eq!(
            context_of(&enhanced.text),
            json!([
                {"name": "http://a.example/name"},
                null,
                {"title": "http://a.example/title"},
                {"@vocab": PLACEHOLDER}
            ])
        );
    }

    #[test]
    fn null_context_is_treated_as_missing() {
        let enhanced = enhance(r#"{"@context": null, "name": "A"}"#, PLACEHOLDER).unwrap();
        assert_eq!(enhanced.original_entries, vec![ContextEntry::Absent]);
        assert_eq!(context_of(&enhanced.text), json!([{"@vocab": PLACEHOLDER}]));
    }

    #[test]
    fn missing_context_gets_only_the_vocab() {
        let doc = r#"{"name": "A"}"#;
        let enhanced = enhance(doc, PLACEHOLDER).unwrap();
        assert_eq!(enhanced.original_entries, vec![ContextEntry::Absent]);

        let written: Value = serde_json::from_str(&enhanced.text).unwrap();
        assert_eq!(written["@context"], json!([{"@vocab": PLACEHOLDER}]));
        assert_eq!(
            written.as_object().unwrap().keys().next().map(String::as_str),
            Some("@context")
        );
    }

    #[test]
    fn existing_vocab_is_left_alone() {
        let doc = r#"{"@context": {"@vocab": "http://schema.org/"}, "name": "A"}"#;
        let enhanced = enhance(doc, PLACEHOLDER).unwrap();
        assert_eq!(context_of(&enhanced.text), json!({"@vocab": "http://schema.org/"}));

        // Enhancing twice changes nothing
        let again = enhance(&enhanced.text, PLACEHOLDER).unwrap();
        assert_eq!(again.text, enhanced.text);
    }

    #[test]
    fn enhancement_is_idempotent() {
        let doc = r#"{"@context": "http://www.w3.org/ns/anno.jsonld"}"#;
        let once = enhance(doc, PLACEHOLDER).unwrap();
        let twice = enhance(&once.text, PLACEHOLDER).unwrap();
        assert_eq!(once.text, twice.text);
    }

    #[test]
    fn non_object_documents_are_rejected() {
        assert!(matches!(
            enhance("[]", PLACEHOLDER),
            Err(Jsonld2TtlError::DocumentParse(_))
        ));
        assert!(matches!(
            enhance("{not json", PLACEHOLDER),
            Err(Jsonld2TtlError::DocumentParse(_))
        ));
        assert!(matches!(
            enhance(r#"{"@context": 5}"#, PLACEHOLDER),
            Err(Jsonld2TtlError::DocumentParse(_))
        ));
    }
}
