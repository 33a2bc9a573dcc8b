//! Request execution and response capture for a single REST sample.
//!
//! One call to [`Sampler::sample`] builds the request (verb, headers, body),
//! sends it, reads and decodes the response, forwards cookies and cache
//! metadata to the configured stores, and assembles a [`SampleResult`].
mod body;
mod client;
mod executor;
mod headers;
mod method;
mod processing;
mod propagate;
mod response;
mod result;
mod spec;


use std::sync::Arc;

use reqwest::{Client, Url};

pub use body::{DEFAULT_CHARSET, SentBody, resolve_charset, send_body};
pub use client::{ClientSettings, DEFAULT_MAX_REDIRECTS, DEFAULT_USER_AGENT, build_client};
pub use headers::{apply_headers, parse_header_block};
pub use method::{HttpMethod, PreparedRequest, build};
pub use processing::{Passthrough, ResultProcessor};
pub use propagate::{
    CacheStore, CachedResponse, CookieStore, ResponseAdapter, propagate_cache, propagate_cookies,
};
pub use response::{ResponseContent, has_entity, is_gzip, read_response};
pub use result::{
    DataType, SampleFailure, SampleResult, charset_of, data_type_of, format_response_headers,
    is_redirect_code, is_success_code, reason_phrase,
};
pub use spec::{RequestSpec, UNDEFINED_URL, resolve_url};

/// Executes samples of one request specification.
///
/// Holds no per-invocation state, so one instance can be shared across
/// tasks and sampled concurrently.
pub struct Sampler {
    client: Client,
    spec: RequestSpec,
    url: Url,
    auto_redirects: bool,
    cookie_store: Option<Arc<dyn CookieStore>>,
    cache_store: Option<Arc<dyn CacheStore>>,
    processor: Arc<dyn ResultProcessor>,
}

impl Sampler {
    /// Creates a sampler for `spec`, resolving its target URL once.
    ///
    /// # Errors
    ///
    /// Returns an error only if the fallback URL cannot be parsed.
    pub fn new(client: Client, spec: RequestSpec) -> Result<Self, url::ParseError> {
        let url = spec.url()?;
        Ok(Self {
            client,
            spec,
            url,
            auto_redirects: false,
            cookie_store: None,
            cache_store: None,
            processor: Arc::new(Passthrough),
        })
    }

    /// Records the client's final URL when it follows redirects itself.
    #[must_use]
    pub const fn with_auto_redirects(mut self, auto_redirects: bool) -> Self {
        self.auto_redirects = auto_redirects;
        self
    }

    #[must_use]
    pub fn with_cookie_store(mut self, store: Arc<dyn CookieStore>) -> Self {
        self.cookie_store = Some(store);
        self
    }

    #[must_use]
    pub fn with_cache_store(mut self, store: Arc<dyn CacheStore>) -> Self {
        self.cache_store = Some(store);
        self
    }

    #[must_use]
    pub fn with_result_processor(mut self, processor: Arc<dyn ResultProcessor>) -> Self {
        self.processor = processor;
        self
    }

    #[must_use]
    pub const fn spec(&self) -> &RequestSpec {
        &self.spec
    }

    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }
}

impl std::fmt::Debug for Sampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sampler")
            .field("spec", &self.spec)
            .field("url", &self.url)
            .field("auto_redirects", &self.auto_redirects)
            .field("cookie_store", &self.cookie_store.is_some())
            .field("cache_store", &self.cache_store.is_some())
            .finish_non_exhaustive()
    }
}
