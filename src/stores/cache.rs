use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use reqwest::header::{CACHE_CONTROL, ETAG, EXPIRES, LAST_MODIFIED};

use crate::sampler::{CacheStore, CachedResponse, SampleResult};

/// Validators and freshness headers recorded for one URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheEntry {
    pub last_modified: Option<String>,
    pub etag: Option<String>,
    pub expires: Option<String>,
    pub cache_control: Option<String>,
}

/// Keeps cache metadata of successful GET samples, keyed by request URL.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl MemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, url: &str) -> Option<CacheEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(url)
            .cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CacheStore for MemoryCache {
    fn save_details(&self, response: &dyn CachedResponse, result: &SampleResult) {
        if response.status().as_u16() != 200 || !result.http_method.eq_ignore_ascii_case("GET") {
            return;
        }
        let header = |name: &str| response.response_header(name).map(str::to_owned);
        let entry = CacheEntry {
            last_modified: header(LAST_MODIFIED.as_str()),
            etag: header(ETAG.as_str()),
            expires: header(EXPIRES.as_str()),
            cache_control: header(CACHE_CONTROL.as_str()),
        };
        tracing::debug!("Saving cache details for {}", response.uri());
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(response.uri().to_string(), entry);
    }
}
