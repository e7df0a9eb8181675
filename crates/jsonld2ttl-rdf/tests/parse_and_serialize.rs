use serde_json::json;
use sophia_api::prelude::*;
use sophia_turtle::parser::turtle;

use jsonld2ttl_rdf::{
    ContextLoader, NoLoader, PrefixMap, StaticLoader, context_document_prefixes, parse_jsonld,
    serialize_turtle,
};

const ANNO_URL: &str = "http://www.w3.org/ns/anno.jsonld";

/// An abridged copy of the Web Annotation context.
fn anno_context() -> serde_json::Value {
    json!({"@context": {
        "oa": "http://www.w3.org/ns/oa#",
        "dc": "http://purl.org/dc/elements/1.1/",
        "rdf": "http://www.w3.org/1999/02/22-rdf-syntax-ns#",
        "id": {"@id": "@id", "@type": "@id"},
        "type": {"@id": "@type", "@type": "@id"},
        "Annotation": "oa:Annotation",
        "TextualBody": "oa:TextualBody",
        "body": {"@type": "@id", "@id": "oa:hasBody"},
        "target": {"@type": "@id", "@id": "oa:hasTarget"},
        "value": "rdf:value",
        "format": "dc:format"
    }})
}

fn anno_loader() -> StaticLoader {
    StaticLoader::new().with_document(ANNO_URL, anno_context())
}

fn triple_count(ttl: &str) -> usize {
    let mut count = 0;
    turtle::parse_str(ttl).for_each_triple(|_| count += 1).unwrap();
    count
}

fn anno_prefixes() -> PrefixMap {
    context_document_prefixes(anno_context().to_string().as_bytes()).unwrap()
}

#[test]
fn context_document_yields_namespace_prefixes() {
    let prefixes = anno_prefixes();
    let pairs: Vec<(&str, &str)> = prefixes.iter().collect();
    assert_eq!(
        pairs,
        vec![
            ("oa", "http://www.w3.org/ns/oa#"),
            ("dc", "http://purl.org/dc/elements/1.1/"),
            ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
        ]
    );
}

#[test]
fn web_annotation_to_turtle() {
    let doc = r#"{
        "@context": [
            "http://www.w3.org/ns/anno.jsonld",
            {"@vocab": "urn:example:uncontextualized:"}
        ],
        "id": "http://example.org/anno1",
        "type": "Annotation",
        "body": {"type": "TextualBody", "value": "A comment", "format": "text/plain"},
        "target": "http://example.com/page1"
    }"#;

    let graph = parse_jsonld(doc, &anno_prefixes(), &anno_loader()).unwrap();
    assert_eq!(graph.len(), 6);

    let ttl = serialize_turtle(&graph).unwrap();
    assert!(ttl.contains(": <urn:example:uncontextualized:>"), "{ttl}");
    assert!(ttl.contains("oa: <http://www.w3.org/ns/oa#>"), "{ttl}");
    assert!(ttl.contains("oa:hasBody"), "{ttl}");
    assert!(ttl.contains("dc:format"), "{ttl}");
    assert!(ttl.contains("<http://example.com/page1>"), "{ttl}");
    // The body is referenced once and written inline
    assert!(!ttl.contains("_:"), "{ttl}");
    assert_eq!(triple_count(&ttl), graph.len());
}

#[test]
fn unmapped_fields_land_in_vocab_namespace() {
    let doc = r#"{
        "@context": [
            "http://www.w3.org/ns/anno.jsonld",
            {"@vocab": "urn:example:uncontextualized:"}
        ],
        "id": "http://example.org/anno1",
        "type": "Annotation",
        "motivation2": "commenting"
    }"#;

    let graph = parse_jsonld(doc, &anno_prefixes(), &anno_loader()).unwrap();
    assert!(
        graph
            .term_strings()
            .contains("urn:example:uncontextualized:motivation2")
    );

    let ttl = serialize_turtle(&graph).unwrap();
    assert!(ttl.contains(":motivation2"), "{ttl}");
    assert!(ttl.contains("\"commenting\""), "{ttl}");
}

#[test]
fn remote_context_must_be_preloaded() {
    let doc = r#"{"@context": "http://www.w3.org/ns/anno.jsonld", "id": "http://example.org/a"}"#;
    let err = parse_jsonld(doc, &PrefixMap::new(), &NoLoader).unwrap_err();
    assert!(err.to_string().contains(ANNO_URL));
}

#[test]
fn loader_is_object_safe() {
    let loaders: Vec<Box<dyn ContextLoader>> = vec![Box::new(NoLoader), Box::new(anno_loader())];
    assert!(loaders[0].load(ANNO_URL).is_err());
    assert!(loaders[1].load(ANNO_URL).is_ok());
}
