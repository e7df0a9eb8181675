use std::collections::HashMap;

use serde_json::{Map, Number, Value};

use crate::error::{RdfError, Result};
use crate::model::*;

/// Convert expanded JSON-LD to an RDF graph.
///
/// Nodes inside `@graph` are added to the same graph as their container.
pub fn to_rdf(expanded: &Value) -> Result<Graph> {
    let mut writer = GraphWriter::default();

    let arr = expanded
        .as_array()
        .ok_or_else(|| RdfError::to_rdf("expanded JSON-LD must be an array"))?;

    for node in arr {
        if let Some(obj) = node.as_object() {
            writer.process_node(obj)?;
        }
    }

    Ok(writer.graph)
}

/// Issues blank node labels. Labels from the document are relabelled so they
/// can never clash with generated ones.
#[derive(Default)]
struct BlankIssuer {
    counter: u64,
    issued: HashMap<String, BlankNode>,
}

impl BlankIssuer {
    fn fresh(&mut self) -> BlankNode {
        let node = BlankNode::new(format!("b{}", self.counter));
        self.counter += 1;
        node
    }

    fn for_label(&mut self, label: &str) -> BlankNode {
        if let Some(node) = self.issued.get(label) {
            return node.clone();
        }
        let node = self.fresh();
        self.issued.insert(label.to_string(), node.clone());
        node
    }
}

#[derive(Default)]
struct GraphWriter {
    graph: Graph,
    blanks: BlankIssuer,
}

impl GraphWriter {
    fn node_for_id(&mut self, id: &str) -> Subject {
        match id.strip_prefix("_:") {
            Some(label) => Subject::Blank(self.blanks.for_label(label)),
            None => Subject::Named(NamedNode::new(id)),
        }
    }

    fn process_node(&mut self, node: &Map<String, Value>) -> Result<Option<Subject>> {
        // A bare @graph container contributes only its nodes
        if let Some(graph) = node.get("@graph") {
            for member in graph.as_array().into_iter().flatten() {
                if let Some(obj) = member.as_object() {
                    self.process_node(obj)?;
                }
            }
            if node.keys().all(|k| k == "@graph") {
                return Ok(None);
            }
        }

        // Determine subject
        let subject = match node.get("@id") {
            Some(id_val) => {
                let id = id_val
                    .as_str()
                    .ok_or_else(|| RdfError::to_rdf("@id must be a string"))?;
                self.node_for_id(id)
            }
            None => Subject::Blank(self.blanks.fresh()),
        };

        // Process @type
        if let Some(types) = node.get("@type")
            && let Some(type_arr) = types.as_array()
        {
            for type_val in type_arr {
                if let Some(type_iri) = type_val.as_str() {
                    let object = if type_iri.starts_with("_:") {
                        Object::from(self.node_for_id(type_iri))
                    } else {
                        Object::Named(NamedNode::new(type_iri))
                    };
                    self.graph.add(Triple::new(
                        subject.clone(),
                        NamedNode::new(rdf::TYPE),
                        object,
                    ));
                }
            }
        }

        // Process properties
        for (key, value) in node {
            if key.starts_with('@') {
                continue; // Skip keywords (@id, @type, @graph already handled)
            }

            // key is an expanded IRI (predicate)
            let predicate = NamedNode::new(key.as_str());

            if let Some(arr) = value.as_array() {
                for item in arr {
                    if let Some(obj) = self.value_to_object(item)? {
                        self.graph
                            .add(Triple::new(subject.clone(), predicate.clone(), obj));
                    }
                }
            }
        }

        Ok(Some(subject))
    }

    /// Convert a JSON-LD expanded value to an RDF object.
    fn value_to_object(&mut self, value: &Value) -> Result<Option<Object>> {
        let Value::Object(obj) = value else {
            return Ok(None); // Shouldn't happen in expanded form
        };

        // Value object: has @value
        if let Some(val) = obj.get("@value") {
            return value_object_to_literal(val, obj).map(|l| Some(Object::Literal(l)));
        }

        // List object: has @list
        if let Some(list) = obj.get("@list") {
            return self.list_to_rdf(list).map(Some);
        }

        // Node reference: has @id only
        if obj.len() == 1
            && let Some(id_val) = obj.get("@id")
        {
            let id = id_val
                .as_str()
                .ok_or_else(|| RdfError::to_rdf("@id must be a string"))?;
            return Ok(Some(Object::from(self.node_for_id(id))));
        }

        // Nested node, recurse
        Ok(self.process_node(obj)?.map(Object::from))
    }

    /// Convert a @list to RDF using rdf:first/rdf:rest/rdf:nil.
    fn list_to_rdf(&mut self, list: &Value) -> Result<Object> {
        let items = list
            .as_array()
            .ok_or_else(|| RdfError::to_rdf("@list must be an array"))?;

        // Objects first, so list nodes are labelled in document order
        let mut objects = Vec::with_capacity(items.len());
        for item in items {
            if let Some(obj) = self.value_to_object(item)? {
                objects.push(obj);
            }
        }

        if objects.is_empty() {
            return Ok(Object::Named(NamedNode::new(rdf::NIL)));
        }

        let nodes: Vec<BlankNode> = objects.iter().map(|_| self.blanks.fresh()).collect();

        for (i, (node, item_obj)) in nodes.iter().zip(objects).enumerate() {
            let rest = match nodes.get(i + 1) {
                Some(next) => Object::Blank(next.clone()),
                None => Object::Named(NamedNode::new(rdf::NIL)),
            };
            self.graph
                .add(Triple::new(node.clone(), NamedNode::new(rdf::FIRST), item_obj));
            self.graph
                .add(Triple::new(node.clone(), NamedNode::new(rdf::REST), rest));
        }

        Ok(Object::Blank(nodes[0].clone()))
    }
}

/// Convert a @value object to an RDF Literal.
fn value_object_to_literal(val: &Value, obj: &Map<String, Value>) -> Result<Literal> {
    if obj.get("@type").and_then(Value::as_str) == Some("@json") {
        return Ok(Literal::typed(val.to_string(), NamedNode::new(rdf::JSON)));
    }

    let string_value = match val {
        Value::String(s) => s.clone(),
        Value::Number(n) => canonical_number(n).0,
        Value::Bool(b) => b.to_string(),
        _ => return Err(RdfError::to_rdf(format!("invalid @value: {val}"))),
    };

    // Check for language tag
    if let Some(lang) = obj.get("@language")
        && let Some(lang_str) = lang.as_str()
    {
        return Ok(Literal::lang(string_value, lang_str));
    }

    // Check for explicit datatype
    if let Some(type_val) = obj.get("@type")
        && let Some(type_str) = type_val.as_str()
    {
        return Ok(Literal::typed(string_value, NamedNode::new(type_str)));
    }

    // Determine default datatype from the value type
    match val {
        Value::Bool(_) => Ok(Literal::typed(string_value, NamedNode::new(xsd::BOOLEAN))),
        Value::Number(n) => Ok(Literal::typed(
            string_value,
            NamedNode::new(canonical_number(n).1),
        )),
        _ => Ok(Literal::new(string_value)),
    }
}

/// Lexical form and datatype of a native JSON number.
///
/// Integral values below 10^21 are `xsd:integer`; everything else is an
/// `xsd:double` in canonical `1.5E0` form.
fn canonical_number(n: &Number) -> (String, &'static str) {
    if n.is_i64() || n.is_u64() {
        return (n.to_string(), xsd::INTEGER);
    }
    let f = n.as_f64().unwrap_or_default();
    if f.fract() == 0.0 && f.abs() < 1e21 {
        return (format!("{f:.0}"), xsd::INTEGER);
    }
    let formatted = format!("{f:E}");
    let canonical = match formatted.split_once('E') {
        Some((mantissa, exponent)) if !mantissa.contains('.') => {
            format!("{mantissa}.0E{exponent}")
        }
        _ => formatted,
    };
    (canonical, xsd::DOUBLE)
}
