//! Namespace prefix declarations.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An insertion-ordered mapping of prefix name to namespace IRI.
///
/// Iteration order is the order in which prefixes were first inserted, which
/// keeps merging and serialization deterministic. Serializes as a flat JSON
/// object.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrefixMap {
    entries: IndexMap<String, String>,
}

impl PrefixMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a declaration. Returns the previous namespace for
    /// `prefix`, if any. A replaced key keeps its original position.
    pub fn insert(
        &mut self,
        prefix: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Option<String> {
        self.entries.insert(prefix.into(), namespace.into())
    }

    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.entries.get(prefix).map(String::as_str)
    }

    pub fn contains_prefix(&self, prefix: &str) -> bool {
        self.entries.contains_key(prefix)
    }

    /// Returns true if any prefix is bound to `namespace`.
    pub fn contains_namespace(&self, namespace: &str) -> bool {
        self.entries.values().any(|ns| ns == namespace)
    }

    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(prefix, ns)| (prefix.as_str(), ns.as_str()))
    }

    /// Keeps only the declarations for which `keep(prefix, namespace)` is true.
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &str) -> bool) {
        self.entries.retain(|prefix, ns| keep(prefix, ns));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PrefixMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for PrefixMap {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl IntoIterator for PrefixMap {
    type Item = (String, String);
    type IntoIter = indexmap::map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Checks that `name` can be written as a Turtle prefix label (`name:`).
///
/// Follows the shape of `PN_PREFIX`: a leading letter, then letters, digits,
/// `_`, `-` or `.`, never ending in `.`. The empty name is not accepted here
/// even though Turtle allows it, because it is reserved for the default
/// namespace.
pub fn is_valid_prefix_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !first.is_alphabetic() {
        return false;
    }
    if name.ends_with('.') {
        return false;
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}
