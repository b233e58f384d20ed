//! Key-value cache seam.
//!
//! The cache-fronted fetchers consult an external cache before touching the
//! network and populate it on first success. From the engine's perspective
//! the cache is append-only: each key is written at most once per logical
//! value and never updated or deleted. Lifetime and eviction belong to the
//! backing store.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use serde_json::Value;

/// External cache consumed by the cache-fronted fetchers.
pub trait Cache: Send + Sync {
    /// Look up a previously stored value by name.
    fn get(&self, name: &str) -> Option<Value>;

    /// Store a value under a name.
    fn set(&self, name: &str, value: Value);
}

/// In-memory cache, for tests and one-shot runs.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Cache for MemoryCache {
    fn get(&self, name: &str) -> Option<Value> {
        self.entries
            .lock()
            .expect("cache lock should not be poisoned")
            .get(name)
            .cloned()
    }

    fn set(&self, name: &str, value: Value) {
        self.entries
            .lock()
            .expect("cache lock should not be poisoned")
            .insert(name.to_string(), value);
    }
}

/// JSON-file-backed cache.
///
/// The whole cache is one JSON object on disk, loaded when opened and
/// rewritten on every `set`. Persistence failures are logged and swallowed:
/// a cache that cannot be written still works as an in-memory cache.
pub struct FileCache {
    path: PathBuf,
    entries: Mutex<HashMap<String, Value>>,
}

impl FileCache {
    /// Open a cache file, starting empty if it is missing or unreadable.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_default(),
            Err(_) => HashMap::new(),
        };
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    fn persist(&self, entries: &HashMap<String, Value>) {
        let json = match serde_json::to_vec_pretty(entries) {
            Ok(json) => json,
            Err(error) => {
                tracing::warn!(%error, "failed to serialize cache");
                return;
            }
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(error) = std::fs::create_dir_all(parent) {
                    tracing::warn!(%error, path = %self.path.display(), "failed to create cache directory");
                    return;
                }
            }
        }

        if let Err(error) = std::fs::write(&self.path, json) {
            tracing::warn!(%error, path = %self.path.display(), "failed to write cache file");
        }
    }
}

impl Cache for FileCache {
    fn get(&self, name: &str) -> Option<Value> {
        self.entries
            .lock()
            .expect("cache lock should not be poisoned")
            .get(name)
            .cloned()
    }

    fn set(&self, name: &str, value: Value) {
        let mut entries = self
            .entries
            .lock()
            .expect("cache lock should not be poisoned");
        entries.insert(name.to_string(), value);
        self.persist(&entries);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_cache_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("recap-cache-test-{}-{tag}.json", std::process::id()))
    }

    #[test]
    fn memory_cache_round_trips_values() {
        let cache = MemoryCache::new();
        assert_eq!(cache.get("user"), None);

        cache.set("user", json!({"login": "octocat"}));
        assert_eq!(cache.get("user"), Some(json!({"login": "octocat"})));
    }

    #[test]
    fn file_cache_persists_across_reopens() {
        let path = temp_cache_path("persist");
        let _ = std::fs::remove_file(&path);

        let cache = FileCache::open(&path);
        cache.set("orgNames", json!(["acme"]));
        drop(cache);

        let reopened = FileCache::open(&path);
        assert_eq!(reopened.get("orgNames"), Some(json!(["acme"])));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn file_cache_starts_empty_when_file_is_corrupt() {
        let path = temp_cache_path("corrupt");
        std::fs::write(&path, b"not json").expect("write corrupt file");

        let cache = FileCache::open(&path);
        assert_eq!(cache.get("repos"), None);

        let _ = std::fs::remove_file(&path);
    }
}
