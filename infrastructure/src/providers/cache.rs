//! Router response cache

use conductor_domain::CompletionResult;
use std::collections::HashMap;
use std::sync::RwLock;

/// Key/value store for completion results, keyed by
/// [`RouteCompletionParams::cache_key`](conductor_domain::RouteCompletionParams::cache_key).
pub trait RouterCache: Send + Sync {
    fn get(&self, key: &str) -> Option<CompletionResult>;
    fn set(&self, key: &str, result: CompletionResult);
}

/// Process-local cache with no eviction.
#[derive(Debug, Default)]
pub struct InMemoryCache {
    entries: RwLock<HashMap<String, CompletionResult>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RouterCache for InMemoryCache {
    fn get(&self, key: &str) -> Option<CompletionResult> {
        self.entries.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, result: CompletionResult) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key.to_string(), result);
        }
    }
}
