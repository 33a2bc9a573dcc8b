use reqwest::header::{HeaderMap, SET_COOKIE};
use reqwest::{StatusCode, Url};

use super::result::SampleResult;

/// Receives raw `Set-Cookie` values seen by the sampler.
pub trait CookieStore: Send + Sync {
    fn add_cookie_from_header(&self, header: &str, url: &Url);
}

/// The view of a response a cache store needs to record its metadata.
pub trait CachedResponse {
    fn status(&self) -> StatusCode;
    fn response_header(&self, name: &str) -> Option<&str>;
    /// The URL the request was issued for.
    fn uri(&self) -> &Url;
}

/// Receives cache metadata of completed samples.
pub trait CacheStore: Send + Sync {
    fn save_details(&self, response: &dyn CachedResponse, result: &SampleResult);
}

/// Response status and headers paired with the originally requested URL.
#[derive(Debug, Clone, Copy)]
pub struct ResponseAdapter<'resp> {
    status: StatusCode,
    headers: &'resp HeaderMap,
    uri: &'resp Url,
}

impl<'resp> ResponseAdapter<'resp> {
    #[must_use]
    pub const fn new(status: StatusCode, headers: &'resp HeaderMap, uri: &'resp Url) -> Self {
        Self {
            status,
            headers,
            uri,
        }
    }
}

impl CachedResponse for ResponseAdapter<'_> {
    fn status(&self) -> StatusCode {
        self.status
    }

    fn response_header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .and_then(|value| value.to_str().ok())
    }

    fn uri(&self) -> &Url {
        self.uri
    }
}

/// Forwards every `Set-Cookie` header, in receipt order, to the store.
pub fn propagate_cookies(headers: &HeaderMap, url: &Url, store: Option<&dyn CookieStore>) {
    let Some(store) = store else {
        return;
    };
    for value in headers.get_all(SET_COOKIE) {
        match value.to_str() {
            Ok(cookie) => store.add_cookie_from_header(cookie, url),
            Err(err) => tracing::debug!("Skipping non-ASCII Set-Cookie header: {}", err),
        }
    }
}

/// Hands the response metadata to the cache store, if one is configured.
pub fn propagate_cache(
    response: &ResponseAdapter<'_>,
    result: &SampleResult,
    store: Option<&dyn CacheStore>,
) {
    if let Some(store) = store {
        store.save_details(response, result);
    }
}
