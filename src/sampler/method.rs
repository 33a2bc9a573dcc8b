use reqwest::{Method, Request, Url};
use serde::Serialize;
use tracing::warn;

/// The closed set of verbs the sampler knows how to issue.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Head,
    Trace,
    Options,
    Delete,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 7] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Head,
        HttpMethod::Trace,
        HttpMethod::Options,
        HttpMethod::Delete,
    ];

    /// Exact, case-sensitive lookup of a verb name.
    #[must_use]
    pub fn lookup(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str() == name)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Head => "HEAD",
            HttpMethod::Trace => "TRACE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// POST and PUT carry a request entity.
    #[must_use]
    pub const fn is_entity_enclosing(self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }

    #[must_use]
    pub const fn to_reqwest(self) -> Method {
        match self {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Head => Method::HEAD,
            HttpMethod::Trace => Method::TRACE,
            HttpMethod::Options => Method::OPTIONS,
            HttpMethod::Delete => Method::DELETE,
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request for one verb, targeting one URL, with no body yet.
#[derive(Debug)]
pub struct PreparedRequest {
    pub method: HttpMethod,
    pub request: Request,
}

/// Maps a verb name onto a request. Unknown verbs are sent as GET.
#[must_use]
pub fn build(method: &str, url: Url) -> PreparedRequest {
    let method = HttpMethod::lookup(method).unwrap_or_else(|| {
        warn!("Unexpected method (converted to GET): {}", method);
        HttpMethod::Get
    });
    PreparedRequest {
        method,
        request: Request::new(method.to_reqwest(), url),
    }
}
