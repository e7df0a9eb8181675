use std::collections::BTreeSet;
use std::fmt;

use indexmap::IndexSet;

use crate::prefix::PrefixMap;

/// An IRI-identified RDF node.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NamedNode {
    pub iri: String,
}

impl NamedNode {
    pub fn new(iri: impl Into<String>) -> Self {
        Self { iri: iri.into() }
    }
}

/// A blank (anonymous) RDF node. The `id` field stores the label without the `_:` prefix.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlankNode {
    pub id: String,
}

impl BlankNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl fmt::Display for BlankNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_:{}", self.id)
    }
}

/// An RDF literal value with datatype and optional language tag.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Literal {
    pub value: String,
    pub datatype: NamedNode,
    pub language: Option<String>,
}

impl Literal {
    /// Create a plain string literal (xsd:string).
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            datatype: NamedNode::new(xsd::STRING),
            language: None,
        }
    }

    /// Create a typed literal.
    pub fn typed(value: impl Into<String>, datatype: NamedNode) -> Self {
        Self {
            value: value.into(),
            datatype,
            language: None,
        }
    }

    /// Create a language-tagged literal (rdf:langString).
    pub fn lang(value: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            datatype: NamedNode::new(rdf::LANG_STRING),
            language: Some(language.into()),
        }
    }
}

/// The subject of an RDF triple.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Subject {
    Named(NamedNode),
    Blank(BlankNode),
}

impl Subject {
    /// The plain string form used when scanning a graph for namespace usage:
    /// the IRI itself, or `_:id` for blank nodes.
    pub fn lexical(&self) -> String {
        match self {
            Self::Named(n) => n.iri.clone(),
            Self::Blank(b) => b.to_string(),
        }
    }
}

impl From<NamedNode> for Subject {
    fn from(n: NamedNode) -> Self {
        Self::Named(n)
    }
}

impl From<BlankNode> for Subject {
    fn from(b: BlankNode) -> Self {
        Self::Blank(b)
    }
}

/// The object of an RDF triple.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Object {
    Named(NamedNode),
    Blank(BlankNode),
    Literal(Literal),
}

impl Object {
    /// The plain string form: the IRI, `_:id`, or the literal's lexical value.
    pub fn lexical(&self) -> String {
        match self {
            Self::Named(n) => n.iri.clone(),
            Self::Blank(b) => b.to_string(),
            Self::Literal(l) => l.value.clone(),
        }
    }
}

impl From<NamedNode> for Object {
    fn from(n: NamedNode) -> Self {
        Self::Named(n)
    }
}

impl From<BlankNode> for Object {
    fn from(b: BlankNode) -> Self {
        Self::Blank(b)
    }
}

impl From<Literal> for Object {
    fn from(l: Literal) -> Self {
        Self::Literal(l)
    }
}

impl From<Subject> for Object {
    fn from(s: Subject) -> Self {
        match s {
            Subject::Named(n) => Self::Named(n),
            Subject::Blank(b) => Self::Blank(b),
        }
    }
}

/// An RDF triple (subject, predicate, object).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Triple {
    pub subject: Subject,
    pub predicate: NamedNode,
    pub object: Object,
}

impl Triple {
    pub fn new(subject: impl Into<Subject>, predicate: NamedNode, object: impl Into<Object>) -> Self {
        Self {
            subject: subject.into(),
            predicate,
            object: object.into(),
        }
    }
}

/// A set of RDF triples with the namespace prefixes declared for it.
///
/// Triples keep their insertion order and duplicates are ignored, so the same
/// statement asserted twice in a document is serialized once.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    triples: IndexSet<Triple>,
    pub prefixes: PrefixMap,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefixes(prefixes: PrefixMap) -> Self {
        Self {
            triples: IndexSet::new(),
            prefixes,
        }
    }

    /// Adds a triple. Returns false if the graph already contained it.
    pub fn add(&mut self, triple: Triple) -> bool {
        self.triples.insert(triple)
    }

    pub fn triples(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Returns the string form of every term in the graph.
    ///
    /// Covers subjects, predicates and objects, plus the datatype IRI of every
    /// literal the serializer writes with an explicit datatype.
    pub fn term_strings(&self) -> BTreeSet<String> {
        let mut terms = BTreeSet::new();
        for t in &self.triples {
            terms.insert(t.subject.lexical());
            terms.insert(t.predicate.iri.clone());
            terms.insert(t.object.lexical());
            if let Object::Literal(lit) = &t.object
                && lit.language.is_none()
                && lit.datatype.iri != xsd::STRING
            {
                terms.insert(lit.datatype.iri.clone());
            }
        }
        terms
    }
}

/// XSD namespace constants.
pub mod xsd {
    pub const NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema#";
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    pub const DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
    pub const DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
    pub const DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";
}

/// RDF namespace constants.
pub mod rdf {
    pub const NAMESPACE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    pub const FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
    pub const REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
    pub const NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";
    pub const LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";
    pub const JSON: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#JSON";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_ignores_duplicates() {
        let mut g = Graph::new();
        let t = Triple::new(
            NamedNode::new("http://example.org/s"),
            NamedNode::new("http://example.org/p"),
            Literal::new("o"),
        );
        assert!(g.add(t.clone()));
        assert!(!g.add(t));
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn term_strings_cover_all_positions() {
        let mut g = Graph::new();
        g.add(Triple::new(
            BlankNode::new("b0"),
            NamedNode::new("http://example.org/p"),
            Literal::typed("7", NamedNode::new(xsd::INTEGER)),
        ));
        g.add(Triple::new(
            NamedNode::new("http://example.org/s"),
            NamedNode::new("http://example.org/q"),
            BlankNode::new("b0"),
        ));

        let terms = g.term_strings();
        assert!(terms.contains("_:b0"));
        assert!(terms.contains("http://example.org/p"));
        assert!(terms.contains("7"));
        assert!(terms.contains(xsd::INTEGER));
        assert!(terms.contains("http://example.org/s"));
        assert!(!terms.contains(xsd::STRING));
    }
}
