use serde_json::{Map, Value, json};

use super::context::{ContainerType, Context, is_absolute_iri};
use super::loader::ContextLoader;
use crate::error::{RdfError, Result};

/// Expand a JSON-LD document to its expanded form.
///
/// The expanded form has all terms replaced with full IRIs, all context
/// processing resolved, and all values in a normalized array/object structure.
pub fn expand_document(document: &Value, loader: &dyn ContextLoader) -> Result<Value> {
    let expander = Expander { loader };
    let result = expander.expand_element(document, &Context::default())?;

    // Wrap in array if not already
    match result {
        Value::Array(_) => Ok(result),
        Value::Null => Ok(json!([])),
        _ => Ok(json!([result])),
    }
}

/// Build the active context of the document's top level.
pub fn top_level_context(document: &Value, loader: &dyn ContextLoader) -> Result<Context> {
    let mut context = Context::default();
    if let Some(ctx_val) = document.get("@context") {
        context.process(ctx_val, loader)?;
    }
    Ok(context)
}

struct Expander<'a> {
    loader: &'a dyn ContextLoader,
}

impl Expander<'_> {
    /// Expand a single JSON-LD element (object, array, or value).
    fn expand_element(&self, element: &Value, context: &Context) -> Result<Value> {
        match element {
            Value::Array(arr) => {
                let mut result = Vec::new();
                for item in arr {
                    let expanded = self.expand_element(item, context)?;
                    match expanded {
                        Value::Array(inner) => result.extend(inner),
                        Value::Null => {} // skip nulls
                        _ => result.push(expanded),
                    }
                }
                Ok(Value::Array(result))
            }
            Value::Object(_) => self.expand_object(element, context),
            // Scalars at the top level are dropped
            _ => Ok(Value::Null),
        }
    }

    /// Expand a JSON-LD object node.
    fn expand_object(&self, obj: &Value, parent_context: &Context) -> Result<Value> {
        let map = obj
            .as_object()
            .ok_or_else(|| RdfError::expansion("expected object"))?;

        // Process local @context if present
        let mut context = parent_context.clone();
        if let Some(ctx_val) = map.get("@context") {
            context.process(ctx_val, self.loader)?;
        }

        // Value objects, list objects and set objects
        if map.keys().any(|k| context.is_keyword(k, "@value")) {
            return expand_value_object(map, &context);
        }
        if let Some(list) = keyword_value(map, &context, "@list") {
            let items = self.expand_property_value(list, None, None, &context)?;
            return Ok(json!({"@list": as_array(items)}));
        }
        if let Some(set) = keyword_value(map, &context, "@set") {
            return self.expand_property_value(set, None, None, &context);
        }

        // Determine @type values and apply scoped contexts from type definitions
        let type_context = self.build_type_scoped_context(map, &context)?;
        let context = type_context.unwrap_or(context);

        let mut result: Map<String, Value> = Map::new();

        for (key, value) in map {
            if key == "@context" {
                continue;
            }

            if context.is_keyword(key, "@id") {
                if let Some(id_str) = value.as_str() {
                    result.insert("@id".to_string(), json!(expand_id(id_str, &context)));
                }
                continue;
            }

            if context.is_keyword(key, "@type") {
                let expanded_types = expand_type_value(value, &context)?;
                result.insert("@type".to_string(), expanded_types);
                continue;
            }

            if context.is_keyword(key, "@graph") {
                let nodes = self.expand_element(value, &context)?;
                result.insert("@graph".to_string(), Value::Array(as_array(nodes)));
                continue;
            }

            // Expand the property key
            let expanded_key = match context.expand_iri(key) {
                Some(iri) if iri.starts_with('@') => {
                    continue; // Skip other keywords and their aliases
                }
                Some(iri) if is_absolute_iri(&iri) && !iri.starts_with("_:") => iri,
                _ => continue, // Drop unmapped terms
            };

            // Get term definition for type coercion and scoped context
            let term_def = context.get_term(key);
            let type_mapping = term_def.and_then(|td| td.type_mapping.as_deref());
            let language = term_def.and_then(|td| td.language.clone());

            // Apply scoped context from the term definition
            let prop_context = match term_def.and_then(|td| td.context.as_ref()) {
                Some(scoped_ctx) => context.with_scoped_context(scoped_ctx, self.loader)?,
                None => context.clone(),
            };

            // Expand the value
            let mut expanded_value =
                self.expand_property_value(value, type_mapping, language, &prop_context)?;

            if term_def.and_then(|td| td.container.as_ref()) == Some(&ContainerType::List)
                && !is_list_object(&expanded_value)
            {
                expanded_value = json!({"@list": as_array(expanded_value)});
            }

            if expanded_value != Value::Null {
                // Merge into result, always as an array (expanded form)
                let entry = result
                    .entry(expanded_key)
                    .or_insert_with(|| Value::Array(Vec::new()));
                if let Some(arr) = entry.as_array_mut() {
                    match expanded_value {
                        Value::Array(items) => arr.extend(items),
                        _ => arr.push(expanded_value),
                    }
                }
            }
        }

        if result.is_empty() {
            return Ok(Value::Null);
        }

        Ok(Value::Object(result))
    }

    /// Build a context with scoped contexts from @type values applied.
    fn build_type_scoped_context(
        &self,
        map: &Map<String, Value>,
        context: &Context,
    ) -> Result<Option<Context>> {
        // Find the type key (could be "@type" or an alias such as "type")
        let Some(type_value) = map
            .iter()
            .find(|(k, _)| context.is_keyword(k, "@type"))
            .map(|(_, v)| v)
        else {
            return Ok(None);
        };

        // Collect type strings, applied in lexicographic order
        let mut types: Vec<&str> = match type_value {
            Value::String(s) => vec![s.as_str()],
            Value::Array(arr) => arr.iter().filter_map(|v| v.as_str()).collect(),
            _ => return Ok(None),
        };
        types.sort_unstable();

        let mut new_context = context.clone();
        let mut had_scoped = false;

        for type_name in &types {
            if let Some(term_def) = context.get_term(type_name)
                && let Some(ref scoped_ctx) = term_def.context
            {
                new_context.process(scoped_ctx, self.loader)?;
                had_scoped = true;
            }
        }

        if had_scoped {
            Ok(Some(new_context))
        } else {
            Ok(None)
        }
    }

    /// Expand a property value with type coercion.
    fn expand_property_value(
        &self,
        value: &Value,
        type_mapping: Option<&str>,
        language: Option<Option<String>>,
        context: &Context,
    ) -> Result<Value> {
        if type_mapping == Some("@json") {
            return Ok(json!({"@value": value, "@type": "@json"}));
        }

        match value {
            Value::Array(arr) => {
                let mut result = Vec::new();
                for item in arr {
                    let expanded =
                        self.expand_property_value(item, type_mapping, language.clone(), context)?;
                    match expanded {
                        Value::Null => {}
                        Value::Array(items) => result.extend(items),
                        _ => result.push(expanded),
                    }
                }
                Ok(Value::Array(result))
            }
            // Recursively expand nested objects
            Value::Object(_) => self.expand_object(value, context),
            Value::String(s) => match type_mapping {
                Some("@id") => Ok(json!({"@id": expand_id(s, context)})),
                Some("@vocab") => {
                    let expanded = context.expand_iri(s).unwrap_or_else(|| s.clone());
                    Ok(json!({"@id": expanded}))
                }
                Some(datatype) => Ok(json!({"@value": s, "@type": datatype})),
                None => {
                    // Term language wins over the default language, even when null
                    let lang = match language {
                        Some(term_lang) => term_lang,
                        None => context.default_language.clone(),
                    };
                    match lang {
                        Some(lang) => Ok(json!({"@value": s, "@language": lang})),
                        None => Ok(json!({"@value": s})),
                    }
                }
            },
            Value::Number(n) => match type_mapping {
                Some(datatype) if !datatype.starts_with('@') => {
                    Ok(json!({"@value": n, "@type": datatype}))
                }
                _ => Ok(json!({"@value": n})),
            },
            Value::Bool(b) => match type_mapping {
                Some(datatype) if !datatype.starts_with('@') => {
                    Ok(json!({"@value": b, "@type": datatype}))
                }
                _ => Ok(json!({"@value": b})),
            },
            Value::Null => Ok(Value::Null),
        }
    }
}

fn keyword_value<'a>(
    map: &'a Map<String, Value>,
    context: &Context,
    keyword: &str,
) -> Option<&'a Value> {
    map.iter()
        .find(|(k, _)| context.is_keyword(k, keyword))
        .map(|(_, v)| v)
}

fn as_array(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => vec![other],
    }
}

fn is_list_object(value: &Value) -> bool {
    value.get("@list").is_some()
}

/// Expand a node identifier. Blank node labels and absolute IRIs are kept,
/// compact IRIs use the context's prefixes, and anything else is left as is.
fn expand_id(id: &str, context: &Context) -> String {
    if id.starts_with("_:") {
        return id.to_string();
    }
    if let Some((prefix, suffix)) = id.split_once(':')
        && !suffix.starts_with("//")
        && let Some(def) = context.get_term(prefix)
        && !def.iri.is_empty()
    {
        return format!("{}{suffix}", def.iri);
    }
    id.to_string()
}

/// Expand @type values to full IRIs.
fn expand_type_value(value: &Value, context: &Context) -> Result<Value> {
    match value {
        Value::String(s) => Ok(json!([expand_type_iri(s, context)])),
        Value::Array(arr) => {
            let expanded: Vec<Value> = arr
                .iter()
                .filter_map(|v| v.as_str())
                .map(|s| json!(expand_type_iri(s, context)))
                .collect();
            Ok(Value::Array(expanded))
        }
        _ => Err(RdfError::expansion(format!("invalid @type value: {value}"))),
    }
}

/// Expand a type name to a full IRI.
fn expand_type_iri(type_name: &str, context: &Context) -> String {
    context
        .expand_iri(type_name)
        .unwrap_or_else(|| type_name.to_string())
}

/// Expand a value object ({ "@value": ... }).
fn expand_value_object(map: &Map<String, Value>, context: &Context) -> Result<Value> {
    let mut result: Map<String, Value> = Map::new();

    for (key, val) in map {
        if context.is_keyword(key, "@value") {
            if val.is_array() || val.is_object() {
                return Err(RdfError::expansion(format!("invalid @value: {val}")));
            }
            result.insert("@value".to_string(), val.clone());
        } else if context.is_keyword(key, "@type") {
            if let Some(type_str) = val.as_str() {
                result.insert("@type".to_string(), json!(expand_type_iri(type_str, context)));
            }
        } else if context.is_keyword(key, "@language")
            && let Some(lang) = val.as_str()
        {
            result.insert("@language".to_string(), json!(lang.to_lowercase()));
        }
    }

    if result.get("@value").is_none_or(Value::is_null) {
        return Ok(Value::Null);
    }

    Ok(Value::Object(result))
}
