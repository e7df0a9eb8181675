//! Collision-free merging of prefix maps.

use std::collections::HashSet;

use jsonld2ttl_rdf::PrefixMap;

/// Merges `incoming` into a copy of `base`.
///
/// A namespace already present is skipped. Otherwise the namespace is added
/// under its own prefix, or under the first free `prefix1`, `prefix2`, ...
/// when that name is taken. Entries of `base` are never renamed.
pub fn merge(base: &PrefixMap, incoming: &PrefixMap) -> PrefixMap {
    let mut merged = base.clone();
    let mut namespaces: HashSet<String> = base.namespaces().map(str::to_string).collect();

    for (prefix, namespace) in incoming.iter() {
        if namespaces.contains(namespace) {
            continue;
        }
        let key = free_prefix(&merged, prefix);
        merged.insert(key, namespace);
        namespaces.insert(namespace.to_string());
    }

    merged
}

/// Left fold of [merge] over `maps`, starting from an empty map.
pub fn merge_all<'a>(maps: impl IntoIterator<Item = &'a PrefixMap>) -> PrefixMap {
    maps.into_iter()
        .fold(PrefixMap::new(), |acc, next| merge(&acc, next))
}

fn free_prefix(map: &PrefixMap, prefix: &str) -> String {
    if !map.contains_prefix(prefix) {
        return prefix.to_string();
    }
    (1..)
        .map(|n| format!("{prefix}{n}"))
        .find(|candidate| !map.contains_prefix(candidate))
        .unwrap_or_else(|| prefix.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(map: &PrefixMap) -> Vec<(&str, &str)> {
        map.iter().collect()
    }

    #[test]
    fn empty_is_identity() {
        let map = PrefixMap::from([("foaf", "http://xmlns.com/foaf/0.1/"), ("dc", "http://purl.org/dc/elements/1.1/")]);
        assert_eq!(pairs(&merge(&PrefixMap::new(), &map)), pairs(&map));
        assert_eq!(pairs(&merge(&map, &PrefixMap::new())), pairs(&map));
    }

    #[test]
    fn colliding_prefix_gets_numbered() {
        let base = PrefixMap::from([("foaf", "A"), ("dc", "B")]);
        let incoming = PrefixMap::from([("foaf", "A2"), ("dc", "B"), ("dcterms", "C"), ("iana", "D")]);
        assert_eq!(
            pairs(&merge(&base, &incoming)),
            vec![
                ("foaf", "A"),
                ("dc", "B"),
                ("foaf1", "A2"),
                ("dcterms", "C"),
                ("iana", "D"),
            ]
        );
    }

    #[test]
    fn known_namespace_is_skipped_under_any_name() {
        let base = PrefixMap::from([("dc", "http://purl.org/dc/elements/1.1/")]);
        let incoming = PrefixMap::from([("dc11", "http://purl.org/dc/elements/1.1/")]);
        assert_eq!(pairs(&merge(&base, &incoming)), pairs(&base));
    }

    #[test]
    fn numbering_skips_taken_names() {
        let base = PrefixMap::from([("ex", "http://a.example/"), ("ex1", "http://b.example/")]);
        let incoming = PrefixMap::from([("ex", "http://c.example/")]);
        assert_eq!(
            merge(&base, &incoming).get("ex2"),
            Some("http://c.example/")
        );
    }

    #[test]
    fn duplicate_namespace_within_incoming() {
        let incoming = PrefixMap::from([("schema", "http://schema.org/"), ("sdo", "http://schema.org/")]);
        assert_eq!(
            pairs(&merge(&PrefixMap::new(), &incoming)),
            vec![("schema", "http://schema.org/")]
        );
    }

    #[test]
    fn fold_keeps_earlier_maps_stable() {
        let first = PrefixMap::from([("oa", "http://www.w3.org/ns/oa#")]);
        let second = PrefixMap::from([("oa", "http://example.org/other-oa#"), ("as", "https://www.w3.org/ns/activitystreams#")]);
        let third = PrefixMap::from([("oa", "http://www.w3.org/ns/oa#")]);
        assert_eq!(
            pairs(&merge_all([&first, &second, &third])),
            vec![
                ("oa", "http://www.w3.org/ns/oa#"),
                ("oa1", "http://example.org/other-oa#"),
                ("as", "https://www.w3.org/ns/activitystreams#"),
            ]
        );
    }
}
