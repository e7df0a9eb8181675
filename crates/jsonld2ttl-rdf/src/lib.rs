//! JSON-LD to RDF to Turtle engine.
//!
//! Expands JSON-LD documents into RDF triple graphs, reads prefix
//! declarations out of JSON-LD context documents, and writes graphs as
//! Turtle.

pub mod error;
pub mod jsonld;
pub mod model;
pub mod prefix;
pub mod turtle;

pub use error::{RdfError, Result};
pub use jsonld::loader::{ContextLoader, NoLoader, StaticLoader, referenced_context_urls};
pub use jsonld::{context_document_prefixes, context_prefixes, parse_jsonld};
pub use model::{BlankNode, Graph, Literal, NamedNode, Object, Subject, Triple, rdf, xsd};
pub use prefix::{PrefixMap, is_valid_prefix_name};
pub use turtle::serialize_turtle;
