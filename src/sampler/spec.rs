use reqwest::Url;
use tracing::warn;

/// Target used when the base host or resource is missing or malformed.
pub const UNDEFINED_URL: &str = "http://undefined.com";

/// Everything one invocation needs to know about the request to send.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestSpec {
    pub base_host: Option<String>,
    pub resource: Option<String>,
    pub query_string: Option<String>,
    /// Verb name; anything outside the supported set is sent as GET.
    pub method: String,
    pub body: Option<String>,
    /// Raw header block, one header per line.
    pub headers: Option<String>,
    /// Charset label for the body; the default charset when absent.
    pub content_encoding: Option<String>,
}

impl RequestSpec {
    /// The absolute URL this spec targets.
    ///
    /// # Errors
    ///
    /// Returns an error only if the fallback URL itself cannot be parsed.
    pub fn url(&self) -> Result<Url, url::ParseError> {
        resolve_url(
            self.base_host.as_deref(),
            self.resource.as_deref(),
            self.query_string.as_deref(),
        )
    }

    #[must_use]
    pub fn header_block(&self) -> &str {
        self.headers.as_deref().unwrap_or_default()
    }
}

impl std::fmt::Display for RequestSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Base host url: {}, resource: {}, Method: {}",
            self.base_host.as_deref().unwrap_or("null"),
            self.resource.as_deref().unwrap_or("null"),
            self.method
        )
    }
}

/// Joins base host, resource and query string into the request URL.
///
/// The base host must parse as an absolute URL; one trailing `/` is
/// removed before the resource is appended verbatim. When either part is
/// missing or the result does not parse, [`UNDEFINED_URL`] is returned.
///
/// # Errors
///
/// Returns an error only if [`UNDEFINED_URL`] cannot be parsed.
pub fn resolve_url(
    base_host: Option<&str>,
    resource: Option<&str>,
    query_string: Option<&str>,
) -> Result<Url, url::ParseError> {
    let joined = base_host
        .and_then(valid_base)
        .zip(resource)
        .and_then(|(base, resource)| {
            let mut full = base;
            full.push_str(resource);
            append_query(&mut full, query_string);
            Url::parse(&full).ok()
        });
    match joined {
        Some(url) => Ok(url),
        None => {
            warn!(
                "Base host {:?} / resource {:?} do not form a URL; using {}",
                base_host, resource, UNDEFINED_URL
            );
            Url::parse(UNDEFINED_URL)
        }
    }
}

fn valid_base(base_host: &str) -> Option<String> {
    let url = Url::parse(base_host).ok()?;
    let mut rendered = String::from(url);
    if rendered.ends_with('/') {
        rendered.pop();
    }
    Some(rendered)
}

fn append_query(url: &mut String, query_string: Option<&str>) {
    let Some(query) = query_string
        .map(|query| query.trim_start_matches('?'))
        .filter(|query| !query.is_empty())
    else {
        return;
    };
    url.push(if url.contains('?') { '&' } else { '?' });
    url.push_str(query);
}
