//! Handles the configuration for the [Converter](crate::Converter).
//!
//! Call the [ConverterConfigBuilder] to create a new configuration.
//!
//! Example: Running with defaults:
//! ```rust
//! use jsonld2ttl::config::ConverterConfigBuilder;
//! let config = ConverterConfigBuilder::default().build();
//! ```
//!
//! Example: Custom cache location and a strict cache:
//! ```rust
//! use jsonld2ttl::config::{ConverterConfigBuilder, CorruptCachePolicy};
//! let config = ConverterConfigBuilder::default()
//!     .with_cache_path("/tmp/jsonld2ttl/namespaceCache.json")
//!     .with_corrupt_cache_policy(CorruptCachePolicy::Fail)
//!     .with_uncontextualized_namespace("urn:example:unmapped:")
//!     .build();
//! ```

use std::path::{Path, PathBuf};

/// Namespace that unmapped JSON fields are expanded into.
pub const DEFAULT_UNCONTEXTUALIZED_NAMESPACE: &str = "urn:example:uncontextualized:";

const CACHE_DIR: &str = ".jsonld2ttl";
const CACHE_FILE: &str = "namespaceCache.json";

/// What to do when the namespace cache file cannot be read as a cache.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CorruptCachePolicy {
    /// Move the file aside to `<name>.corrupt` and start with an empty cache.
    #[default]
    Reset,
    /// Fail with [CacheCorrupt](crate::errors::Jsonld2TtlError::CacheCorrupt).
    Fail,
}

/// Configuration for the converter.
///
/// Use the [ConverterConfigBuilder] to create a new configuration.
#[derive(Clone, Debug)]
pub struct ConverterConfig {
    pub(crate) cache_path: PathBuf,
    pub(crate) uncontextualized_namespace: String,
    pub(crate) corrupt_cache_policy: CorruptCachePolicy,
    pub(crate) document_cache_capacity: u64,
    pub(crate) user_agent: String,
}

impl ConverterConfig {
    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    pub fn uncontextualized_namespace(&self) -> &str {
        &self.uncontextualized_namespace
    }

    pub fn corrupt_cache_policy(&self) -> CorruptCachePolicy {
        self.corrupt_cache_policy
    }
}

/// Converter Config Builder to construct options required for the converter.
///
/// - cache_path: Namespace cache file (default: `$HOME/.jsonld2ttl/namespaceCache.json`).
/// - uncontextualized_namespace: Placeholder `@vocab` namespace (default: `urn:example:uncontextualized:`).
/// - corrupt_cache_policy: Handling of an unreadable cache file (default: [CorruptCachePolicy::Reset]).
/// - document_cache_capacity: Fetched context documents kept in memory (default: 100).
/// - user_agent: User-Agent header for context fetches.
pub struct ConverterConfigBuilder {
    cache_path: Option<PathBuf>,
    uncontextualized_namespace: String,
    corrupt_cache_policy: CorruptCachePolicy,
    document_cache_capacity: u64,
    user_agent: String,
}

impl Default for ConverterConfigBuilder {
    fn default() -> Self {
        Self {
            cache_path: None,
            uncontextualized_namespace: DEFAULT_UNCONTEXTUALIZED_NAMESPACE.into(),
            corrupt_cache_policy: CorruptCachePolicy::default(),
            document_cache_capacity: 100,
            user_agent: format!("jsonld2ttl/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ConverterConfigBuilder {
    /// Set the namespace cache file. Its directory is created when missing.
    pub fn with_cache_path(mut self, cache_path: impl Into<PathBuf>) -> Self {
        self.cache_path = Some(cache_path.into());
        self
    }

    /// Set the placeholder namespace for fields no context maps.
    /// Default: `urn:example:uncontextualized:`
    pub fn with_uncontextualized_namespace(mut self, namespace: &str) -> Self {
        self.uncontextualized_namespace = namespace.into();
        self
    }

    /// Set how an unreadable cache file is handled.
    /// Default: [CorruptCachePolicy::Reset]
    pub fn with_corrupt_cache_policy(mut self, policy: CorruptCachePolicy) -> Self {
        self.corrupt_cache_policy = policy;
        self
    }

    /// Set the number of fetched context documents kept in memory.
    /// Default: 100 documents
    pub fn with_document_cache_capacity(mut self, capacity: u64) -> Self {
        self.document_cache_capacity = capacity;
        self
    }

    /// Set the User-Agent sent with context requests.
    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build the [ConverterConfig].
    pub fn build(self) -> ConverterConfig {
        ConverterConfig {
            cache_path: self.cache_path.unwrap_or_else(default_cache_path),
            uncontextualized_namespace: self.uncontextualized_namespace,
            corrupt_cache_policy: self.corrupt_cache_policy,
            document_cache_capacity: self.document_cache_capacity,
            user_agent: self.user_agent,
        }
    }
}

/// `$HOME/.jsonld2ttl/namespaceCache.json`, falling back to `USERPROFILE`
/// and then to the current directory.
pub fn default_cache_path() -> PathBuf {
    let home = std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    home.join(CACHE_DIR).join(CACHE_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ConverterConfigBuilder::default().build();
        assert_eq!(
            config.uncontextualized_namespace(),
            DEFAULT_UNCONTEXTUALIZED_NAMESPACE
        );
        assert_eq!(config.corrupt_cache_policy(), CorruptCachePolicy::Reset);
        assert_eq!(config.document_cache_capacity, 100);
        assert!(config.cache_path().ends_with(".jsonld2ttl/namespaceCache.json"));
        assert!(config.user_agent.starts_with("jsonld2ttl/"));
    }

    #[test]
    fn overrides() {
        let config = ConverterConfigBuilder::default()
            .with_cache_path("/tmp/cache.json")
            .with_uncontextualized_namespace("urn:x:")
            .with_corrupt_cache_policy(CorruptCachePolicy::Fail)
            .with_document_cache_capacity(5)
            .with_user_agent("test-agent")
            .build();
        assert_eq!(config.cache_path(), Path::new("/tmp/cache.json"));
        assert_eq!(config.uncontextualized_namespace(), "urn:x:");
        assert_eq!(config.corrupt_cache_policy(), CorruptCachePolicy::Fail);
        assert_eq!(config.document_cache_capacity, 5);
        assert_eq!(config.user_agent, "test-agent");
    }
}
