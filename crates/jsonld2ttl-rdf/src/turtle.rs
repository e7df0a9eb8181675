//! Turtle output through sophia's pretty serializer.

use sophia_api::prefix::{Prefix, PrefixMapPair};
use sophia_api::serializer::{Stringifier, TripleSerializer};
use sophia_api::term::{BnodeId, LanguageTag, SimpleTerm};
use sophia_iri::{Iri, IriRef};
use sophia_turtle::serializer::turtle::{TurtleConfig, TurtleSerializer};
use tracing::debug;

use crate::error::{RdfError, Result};
use crate::model::{Graph, Literal, NamedNode, Object, Subject};

/// Serialize a graph to Turtle, declaring the graph's prefixes.
///
/// Prefixes are declared in prefix-name order. Blank nodes referenced once
/// are written inline as `[ ... ]`.
pub fn serialize_turtle(graph: &Graph) -> Result<String> {
    let triples: Vec<[SimpleTerm<'_>; 3]> = graph
        .triples()
        .map(|t| {
            [
                subject_term(&t.subject),
                iri_term(&t.predicate),
                object_term(&t.object),
            ]
        })
        .collect();

    let config = TurtleConfig::new()
        .with_pretty(true)
        .with_own_prefix_map(prefix_pairs(graph));
    let mut serializer = TurtleSerializer::new_stringifier_with_config(config);
    serializer
        .serialize_graph(&triples)
        .map_err(|e| RdfError::serialization(format!("failed to write Turtle: {e}")))?;

    Ok(serializer.as_str().to_owned())
}

fn prefix_pairs(graph: &Graph) -> Vec<PrefixMapPair> {
    let mut declared: Vec<(&str, &str)> = graph.prefixes.iter().collect();
    declared.sort_unstable();

    declared
        .into_iter()
        .filter_map(|(prefix, namespace)| {
            match (Prefix::new(Box::from(prefix)), Iri::new(Box::from(namespace))) {
                (Ok(prefix), Ok(namespace)) => Some((prefix, namespace)),
                _ => {
                    debug!("prefix ({prefix}: {namespace}) can't be declared in Turtle, skipped");
                    None
                }
            }
        })
        .collect()
}

fn iri_term(node: &NamedNode) -> SimpleTerm<'_> {
    SimpleTerm::Iri(IriRef::new_unchecked(node.iri.as_str().into()))
}

fn subject_term(subject: &Subject) -> SimpleTerm<'_> {
    match subject {
        Subject::Named(n) => iri_term(n),
        Subject::Blank(b) => SimpleTerm::BlankNode(BnodeId::new_unchecked(b.id.as_str().into())),
    }
}

fn object_term(object: &Object) -> SimpleTerm<'_> {
    match object {
        Object::Named(n) => iri_term(n),
        Object::Blank(b) => SimpleTerm::BlankNode(BnodeId::new_unchecked(b.id.as_str().into())),
        Object::Literal(lit) => literal_term(lit),
    }
}

fn literal_term(lit: &Literal) -> SimpleTerm<'_> {
    match &lit.language {
        Some(lang) => SimpleTerm::LiteralLanguage(
            lit.value.as_str().into(),
            LanguageTag::new_unchecked(lang.as_str().into()),
        ),
        None => SimpleTerm::LiteralDatatype(
            lit.value.as_str().into(),
            IriRef::new_unchecked(lit.datatype.iri.as_str().into()),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BlankNode, Graph, Triple, rdf, xsd};
    use crate::prefix::PrefixMap;
    use sophia_api::prelude::*;
    use sophia_api::triple::Triple as _;
    use sophia_turtle::parser::turtle;

    const FOAF: &str = "http://xmlns.com/foaf/0.1/";

    fn foaf(local: &str) -> NamedNode {
        NamedNode::new(format!("{FOAF}{local}"))
    }

    fn alice() -> NamedNode {
        NamedNode::new("http://example.org/alice")
    }

    /// Lexical forms of the literal objects in `ttl`, after parsing it back.
    fn literal_values(ttl: &str) -> Vec<String> {
        let mut values = Vec::new();
        turtle::parse_str(ttl)
            .for_each_triple(|t| {
                if let Some(lex) = t.o().lexical_form() {
                    values.push(String::from(&*lex));
                }
            })
            .unwrap();
        values
    }

    fn triple_count(ttl: &str) -> usize {
        let mut count = 0;
        turtle::parse_str(ttl).for_each_triple(|_| count += 1).unwrap();
        count
    }

    #[test]
    fn declares_prefixes_and_compacts_iris() {
        let mut graph = Graph::with_prefixes(PrefixMap::from([
            ("rdf", rdf::NAMESPACE),
            ("foaf", FOAF),
        ]));
        graph.add(Triple::new(alice(), foaf("name"), Literal::new("Alice")));
        graph.add(Triple::new(alice(), NamedNode::new(rdf::TYPE), foaf("Person")));
        graph.add(Triple::new(
            alice(),
            foaf("age"),
            Literal::typed("42", NamedNode::new(xsd::INTEGER)),
        ));

        let ttl = serialize_turtle(&graph).unwrap();
        assert!(ttl.contains("foaf: <http://xmlns.com/foaf/0.1/>"), "{ttl}");
        assert!(ttl.contains("foaf:Person"), "{ttl}");
        assert!(ttl.contains("foaf:name"), "{ttl}");
        assert!(!ttl.contains("<http://xmlns.com/foaf/0.1/name>"), "{ttl}");
        assert_eq!(triple_count(&ttl), 3);
    }

    #[test]
    fn single_reference_blank_nodes_are_inlined() {
        let mut graph = Graph::with_prefixes(PrefixMap::from([("foaf", FOAF)]));
        graph.add(Triple::new(alice(), foaf("knows"), BlankNode::new("b0")));
        graph.add(Triple::new(BlankNode::new("b0"), foaf("name"), Literal::new("Bob")));

        let ttl = serialize_turtle(&graph).unwrap();
        assert!(!ttl.contains("_:b0"), "{ttl}");
        assert!(ttl.contains('['), "{ttl}");
        assert_eq!(triple_count(&ttl), 2);
    }

    #[test]
    fn blank_cycles_are_written() {
        let mut graph = Graph::new();
        let p = NamedNode::new("http://example.org/p");
        graph.add(Triple::new(BlankNode::new("b0"), p.clone(), BlankNode::new("b1")));
        graph.add(Triple::new(BlankNode::new("b1"), p, BlankNode::new("b0")));

        let ttl = serialize_turtle(&graph).unwrap();
        assert_eq!(triple_count(&ttl), 2);
    }

    #[test]
    fn literals_survive_escaping() {
        let mut graph = Graph::with_prefixes(PrefixMap::from([(
            "",
            "urn:example:uncontextualized:",
        )]));
        let note = NamedNode::new("urn:example:uncontextualized:note");
        graph.add(Triple::new(alice(), note.clone(), Literal::new("line\n\"two\"")));
        graph.add(Triple::new(alice(), note.clone(), Literal::lang("hallo", "nl")));
        graph.add(Triple::new(
            alice(),
            note,
            Literal::typed("2024-01-01T00:00:00Z", NamedNode::new(xsd::DATE_TIME)),
        ));

        let ttl = serialize_turtle(&graph).unwrap();
        assert!(ttl.contains(": <urn:example:uncontextualized:>"), "{ttl}");

        let mut values = literal_values(&ttl);
        values.sort();
        assert_eq!(values, vec!["2024-01-01T00:00:00Z", "hallo", "line\n\"two\""]);
    }

    #[test]
    fn undeclarable_prefixes_are_skipped() {
        let graph = Graph::with_prefixes(PrefixMap::from([
            ("ex", "http://example.org/"),
            ("not valid", "http://invalid.example/"),
        ]));
        let pairs = prefix_pairs(&graph);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].1.as_str(), "http://example.org/");
    }
}
