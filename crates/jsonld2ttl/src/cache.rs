//! Disk-persisted cache of context URL -> extracted prefix map.
//!
//! The cache file is a flat JSON object:
//! ```json
//! {
//!   "http://www.w3.org/ns/anno.jsonld": {
//!     "oa": "http://www.w3.org/ns/oa#",
//!     "dc": "http://purl.org/dc/elements/1.1/"
//!   }
//! }
//! ```

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use jsonld2ttl_rdf::PrefixMap;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, warn};

use crate::config::CorruptCachePolicy;
use crate::errors::Jsonld2TtlError;

type Entries = IndexMap<String, PrefixMap>;

/// Namespace cache shared by the extractor and the converter.
///
/// The file is read lazily on first use and written through on every
/// [put](NamespaceCache::put). Entries never expire.
#[derive(Debug)]
pub struct NamespaceCache {
    path: PathBuf,
    policy: CorruptCachePolicy,
    entries: OnceCell<Mutex<Entries>>,
}

impl NamespaceCache {
    pub fn new(path: impl Into<PathBuf>, policy: CorruptCachePolicy) -> Self {
        Self {
            path: path.into(),
            policy,
            entries: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn entries(&self) -> Result<&Mutex<Entries>, Jsonld2TtlError> {
        self.entries
            .get_or_try_init(|| async { self.load().await.map(Mutex::new) })
            .await
    }

    /// Reads the cache file. A missing file is an empty cache.
    ///
    /// An unreadable file is handled according to the [CorruptCachePolicy].
    pub async fn load(&self) -> Result<IndexMap<String, PrefixMap>, Jsonld2TtlError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("no namespace cache at ({}), starting empty", self.path.display());
                return Ok(Entries::new());
            }
            Err(e) => {
                return Err(Jsonld2TtlError::Cache(format!(
                    "Couldn't read ({}): {e}",
                    self.path.display()
                )));
            }
        };

        match serde_json::from_slice::<Entries>(&bytes) {
            Ok(entries) => {
                debug!(
                    "loaded {} namespace cache entries from ({})",
                    entries.len(),
                    self.path.display()
                );
                Ok(entries)
            }
            Err(e) => match self.policy {
                CorruptCachePolicy::Fail => Err(Jsonld2TtlError::CacheCorrupt(format!(
                    "{}: {e}",
                    self.path.display()
                ))),
                CorruptCachePolicy::Reset => {
                    let aside = corrupt_path(&self.path);
                    tokio::fs::rename(&self.path, &aside).await.map_err(|err| {
                        Jsonld2TtlError::Cache(format!(
                            "Couldn't move corrupt cache ({}) aside: {err}",
                            self.path.display()
                        ))
                    })?;
                    warn!(
                        "namespace cache ({}) is corrupt ({e}), moved to ({}) and starting empty",
                        self.path.display(),
                        aside.display()
                    );
                    Ok(Entries::new())
                }
            },
        }
    }

    /// Returns the cached prefix map for a context URL.
    pub async fn get(&self, key: &str) -> Result<Option<PrefixMap>, Jsonld2TtlError> {
        let entries = self.entries().await?.lock().await;
        Ok(entries.get(key).cloned())
    }

    /// Stores the prefix map for a context URL and persists the cache.
    pub async fn put(&self, key: &str, value: PrefixMap) -> Result<(), Jsonld2TtlError> {
        let mut entries = self.entries().await?.lock().await;
        entries.insert(key.to_string(), value);
        self.write(&entries).await
    }

    /// Writes the current entries to disk.
    pub async fn persist(&self) -> Result<(), Jsonld2TtlError> {
        let entries = self.entries().await?.lock().await;
        self.write(&entries).await
    }

    pub async fn len(&self) -> Result<usize, Jsonld2TtlError> {
        Ok(self.entries().await?.lock().await.len())
    }

    pub async fn is_empty(&self) -> Result<bool, Jsonld2TtlError> {
        Ok(self.len().await? == 0)
    }

    /// Writes a sibling temporary file and renames it over the cache file.
    /// Callers hold the entries lock, so writes never interleave.
    async fn write(&self, entries: &Entries) -> Result<(), Jsonld2TtlError> {
        let cache_err = |action: &str, e: std::io::Error| {
            Jsonld2TtlError::Cache(format!("Couldn't {action} ({}): {e}", self.path.display()))
        };

        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| cache_err("create cache directory for", e))?;
        }

        let json = serde_json::to_vec_pretty(entries)
            .map_err(|e| Jsonld2TtlError::Cache(format!("Couldn't serialize cache: {e}")))?;
        let tmp = sibling_path(&self.path, ".tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| cache_err("write temporary file for", e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| cache_err("replace", e))?;

        debug!(
            "wrote {} namespace cache entries to ({})",
            entries.len(),
            self.path.display()
        );
        Ok(())
    }
}

fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("namespaceCache.json"));
    name.push(suffix);
    path.with_file_name(name)
}

fn corrupt_path(path: &Path) -> PathBuf {
    sibling_path(path, ".corrupt")
}
