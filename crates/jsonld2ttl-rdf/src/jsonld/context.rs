use std::collections::HashMap;

use serde_json::Value;

use super::loader::ContextLoader;
use crate::error::{RdfError, Result};

/// Maximum nesting of remote contexts that reference further remote contexts.
const MAX_REMOTE_DEPTH: usize = 10;

/// A processed JSON-LD context that maps terms to IRIs and type/container info.
#[derive(Clone, Debug, Default)]
pub struct Context {
    pub terms: HashMap<String, TermDefinition>,
    pub vocab: Option<String>,
    pub base: Option<String>,
    pub default_language: Option<String>,
}

/// A single term definition within a JSON-LD context.
#[derive(Clone, Debug)]
pub struct TermDefinition {
    pub iri: String,
    pub type_mapping: Option<String>,
    pub container: Option<ContainerType>,
    pub context: Option<Value>,
    pub language: Option<Option<String>>,
    pub protected: bool,
}

impl TermDefinition {
    fn simple(iri: String, protected: bool) -> Self {
        Self {
            iri,
            type_mapping: None,
            container: None,
            context: None,
            language: None,
            protected,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContainerType {
    Set,
    List,
    Graph,
}

impl Context {
    /// Process a `@context` value (string URL, object, or array) and merge into this context.
    pub fn process(&mut self, context_value: &Value, loader: &dyn ContextLoader) -> Result<()> {
        self.process_at_depth(context_value, loader, 0)
    }

    fn process_at_depth(
        &mut self,
        context_value: &Value,
        loader: &dyn ContextLoader,
        depth: usize,
    ) -> Result<()> {
        match context_value {
            Value::Array(arr) => {
                for item in arr {
                    self.process_at_depth(item, loader, depth)?;
                }
            }
            Value::String(url) => {
                self.process_remote(url, loader, depth)?;
            }
            Value::Object(_) => {
                self.process_context_object(context_value)?;
            }
            Value::Null => {
                // Reset context
                self.terms.clear();
                self.vocab = None;
                self.base = None;
                self.default_language = None;
            }
            _ => {
                return Err(RdfError::context(format!(
                    "invalid @context value: {context_value}"
                )));
            }
        }
        Ok(())
    }

    fn process_remote(&mut self, url: &str, loader: &dyn ContextLoader, depth: usize) -> Result<()> {
        if depth >= MAX_REMOTE_DEPTH {
            return Err(RdfError::context(format!(
                "context overflow: more than {MAX_REMOTE_DEPTH} nested remote contexts at {url}"
            )));
        }
        let context_doc = loader.load(url)?;
        // The remote doc has {"@context": ...}, extract the inner value
        let inner = context_doc.get("@context").ok_or_else(|| {
            RdfError::context(format!("context document missing @context key: {url}"))
        })?;
        self.process_at_depth(inner, loader, depth + 1)
    }

    fn process_context_object(&mut self, ctx: &Value) -> Result<()> {
        let obj = ctx
            .as_object()
            .ok_or_else(|| RdfError::context("@context value is not an object"))?;

        // Process @base first, @vocab may be relative to it
        if let Some(base) = obj.get("@base") {
            self.base = base.as_str().map(|s| s.to_string());
        }

        if let Some(vocab) = obj.get("@vocab") {
            self.vocab = match vocab {
                Value::String(v) if v.is_empty() => self.base.clone(),
                Value::String(v) => Some(resolve_iri(v, self)),
                _ => None,
            };
        }

        if let Some(lang) = obj.get("@language") {
            self.default_language = lang.as_str().map(|s| s.to_lowercase());
        }

        let is_protected = obj
            .get("@protected")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);

        // Term definitions may reference each other, so define them in two
        // passes: plain prefix-like definitions first, then everything else.
        for (key, value) in obj {
            if key.starts_with('@') || !value.is_string() {
                continue;
            }
            let term_def = create_term_definition(key, value, is_protected, self)?;
            self.terms.insert(key.clone(), term_def);
        }
        for (key, value) in obj {
            if key.starts_with('@') {
                continue;
            }
            let term_def = create_term_definition(key, value, is_protected, self)?;
            self.terms.insert(key.clone(), term_def);
        }

        Ok(())
    }

    /// Expand a term or compact IRI to a full IRI using this context.
    ///
    /// Returns `None` for unmapped terms when no `@vocab` applies and for
    /// terms explicitly defined as `null`.
    pub fn expand_iri(&self, value: &str) -> Option<String> {
        // JSON-LD keywords
        if value.starts_with('@') {
            return Some(value.to_string());
        }

        // Look up as a term
        if let Some(def) = self.terms.get(value) {
            if def.iri.is_empty() {
                return None;
            }
            return Some(def.iri.clone());
        }

        // Try compact IRI (prefix:suffix)
        if let Some((prefix, suffix)) = value.split_once(':') {
            if !suffix.starts_with("//")
                && let Some(def) = self.terms.get(prefix)
                && !def.iri.is_empty()
            {
                return Some(format!("{}{suffix}", def.iri));
            }
            // If it has a colon but prefix isn't in context, it may be an
            // Unknown IRI scheme, returned as-is
            if is_absolute_iri(value) {
                return Some(value.to_string());
            }
        }

        // Use vocab mapping
        if let Some(ref vocab) = self.vocab {
            return Some(format!("{vocab}{value}"));
        }

        None
    }

    /// Get the term definition for a given term name.
    pub fn get_term(&self, term: &str) -> Option<&TermDefinition> {
        self.terms.get(term)
    }

    /// Returns true if `key` is `keyword` itself or a term aliased to it.
    pub fn is_keyword(&self, key: &str, keyword: &str) -> bool {
        key == keyword || self.terms.get(key).is_some_and(|def| def.iri == keyword)
    }

    /// Create a child context by processing a scoped @context from a term definition,
    /// layered on top of the current context.
    pub fn with_scoped_context(
        &self,
        scoped_context: &Value,
        loader: &dyn ContextLoader,
    ) -> Result<Context> {
        let mut child = self.clone();
        child.process(scoped_context, loader)?;
        Ok(child)
    }
}

fn create_term_definition(
    term: &str,
    value: &Value,
    parent_protected: bool,
    ctx: &Context,
) -> Result<TermDefinition> {
    match value {
        Value::String(iri_or_term) => {
            // Simple mapping: "term": "iri" or "term": "otherTerm"
            let resolved = resolve_iri(iri_or_term, ctx);
            Ok(TermDefinition::simple(resolved, parent_protected))
        }
        Value::Object(obj) => {
            // Expanded term definition
            let resolved_iri = match obj.get("@id") {
                Some(Value::Null) => String::new(),
                Some(Value::String(id)) => resolve_iri(id, ctx),
                _ => resolve_iri(term, ctx),
            };

            let type_mapping = obj.get("@type").and_then(|v| v.as_str()).map(|t| {
                if t.starts_with('@') {
                    t.to_string()
                } else {
                    resolve_iri(t, ctx)
                }
            });

            let container = obj.get("@container").and_then(|v| {
                let names: Vec<&str> = match v {
                    Value::String(s) => vec![s.as_str()],
                    Value::Array(arr) => arr.iter().filter_map(|c| c.as_str()).collect(),
                    _ => Vec::new(),
                };
                if names.contains(&"@list") {
                    Some(ContainerType::List)
                } else if names.contains(&"@graph") {
                    Some(ContainerType::Graph)
                } else if names.contains(&"@set") {
                    Some(ContainerType::Set)
                } else {
                    None
                }
            });

            let language = obj
                .get("@language")
                .map(|v| v.as_str().map(|s| s.to_lowercase()));

            let scoped_context = obj.get("@context").cloned();

            let protected = obj
                .get("@protected")
                .and_then(|v| v.as_bool())
                .unwrap_or(parent_protected);

            Ok(TermDefinition {
                iri: resolved_iri,
                type_mapping,
                container,
                context: scoped_context,
                language,
                protected,
            })
        }
        Value::Null => {
            // Explicit null: the term is unmapped
            Ok(TermDefinition::simple(String::new(), false))
        }
        _ => Err(RdfError::context(format!(
            "invalid term definition for '{term}': {value}"
        ))),
    }
}

/// Resolve an IRI or term reference against the context.
fn resolve_iri(value: &str, ctx: &Context) -> String {
    // JSON-LD keyword
    if value.starts_with('@') {
        return value.to_string();
    }

    // Look up as existing term
    if let Some(def) = ctx.terms.get(value) {
        return def.iri.clone();
    }

    // Try compact IRI
    if let Some((prefix, suffix)) = value.split_once(':') {
        if !suffix.starts_with("//")
            && let Some(def) = ctx.terms.get(prefix)
        {
            return format!("{}{suffix}", def.iri);
        }
        if is_absolute_iri(value) {
            return value.to_string();
        }
    }

    // Use vocab
    if let Some(ref vocab) = ctx.vocab {
        return format!("{vocab}{value}");
    }

    value.to_string()
}

/// Check if a string looks like an absolute IRI (has a scheme).
pub fn is_absolute_iri(value: &str) -> bool {
    let Some((scheme, _)) = value.split_once(':') else {
        return false;
    };
    // A scheme starts with a letter and contains only letters, digits, +, -, .
    scheme
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.')
}
