use std::fmt::Write as _;
use std::time::{Duration, Instant};

use chrono::{DateTime, TimeDelta, Utc};
use hyper::ext::ReasonPhrase;
use reqwest::header::HeaderMap;
use reqwest::{StatusCode, Url, Version};
use serde::{Serialize, Serializer};

use crate::error::{SampleError, SampleErrorKind};

/// Whether the captured body is text or binary, derived from the content type.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    #[default]
    Unknown,
    Text,
    Bin,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SampleFailure {
    pub kind: SampleErrorKind,
    pub message: String,
}

/// One measured execution of a single request.
#[derive(Debug, Clone, Serialize)]
pub struct SampleResult {
    pub label: String,
    pub http_method: String,
    pub url: Url,
    pub request_headers: String,
    /// Request body as configured, for entity-enclosing methods.
    pub sampler_data: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Time until the response headers arrived.
    pub latency_ms: u64,
    pub response_code: String,
    pub response_message: String,
    pub successful: bool,
    pub response_headers: String,
    #[serde(serialize_with = "serialize_body")]
    pub response_body: Vec<u8>,
    pub content_type: Option<String>,
    pub encoding: Option<String>,
    pub data_type: DataType,
    pub redirect_location: Option<String>,
    pub bytes: u64,
    pub failure: Option<SampleFailure>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sub_results: Vec<SampleResult>,
    #[serde(skip)]
    clock: Option<Instant>,
}

fn serialize_body<T, S>(body: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: AsRef<[u8]>,
    S: Serializer,
{
    serializer.serialize_str(&String::from_utf8_lossy(body.as_ref()))
}

impl SampleResult {
    /// Opens a sample: records the start instant and a provisional label.
    #[must_use]
    pub fn started(url: &Url, method: &str) -> Self {
        let start_time = Utc::now();
        Self {
            label: url.to_string(),
            http_method: method.to_owned(),
            url: url.clone(),
            request_headers: String::new(),
            sampler_data: None,
            start_time,
            end_time: start_time,
            latency_ms: 0,
            response_code: String::new(),
            response_message: String::new(),
            successful: false,
            response_headers: String::new(),
            response_body: Vec::new(),
            content_type: None,
            encoding: None,
            data_type: DataType::Unknown,
            redirect_location: None,
            bytes: 0,
            failure: None,
            sub_results: Vec::new(),
            clock: Some(Instant::now()),
        }
    }

    /// A result that failed before any request could be issued.
    #[must_use]
    pub fn failed(url: &Url, method: &str, error: &SampleError) -> Self {
        Self::started(url, method).into_error(error)
    }

    fn instant_after(&self, elapsed: Duration) -> DateTime<Utc> {
        TimeDelta::from_std(elapsed)
            .ok()
            .and_then(|delta| self.start_time.checked_add_signed(delta))
            .unwrap_or(self.start_time)
    }

    /// Records the time to first response headers.
    pub fn latency_end(&mut self) {
        if let Some(clock) = self.clock {
            self.latency_ms = duration_ms(clock.elapsed());
        }
    }

    /// Closes the timing window. Later calls keep the first end time.
    pub fn sample_end(&mut self) {
        if let Some(clock) = self.clock.take() {
            self.end_time = self.instant_after(clock.elapsed());
        }
    }

    #[must_use]
    pub fn elapsed_ms(&self) -> u64 {
        self.end_time
            .signed_duration_since(self.start_time)
            .to_std()
            .map(duration_ms)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        self.response_code.parse().ok()
    }

    #[must_use]
    pub fn is_redirect(&self) -> bool {
        self.status_code().is_some_and(is_redirect_code)
    }

    pub fn set_response_body(&mut self, body: Vec<u8>) {
        self.bytes = u64::try_from(body.len()).unwrap_or(u64::MAX);
        self.response_body = body;
    }

    /// Records the status line fields and the success verdict.
    pub fn set_status(&mut self, status: StatusCode, reason: &str) {
        self.response_code = status.as_u16().to_string();
        self.successful = is_success_code(status.as_u16());
        reason.clone_into(&mut self.response_message);
    }

    /// Stores the raw content type plus its charset and data type.
    pub fn set_encoding_and_type(&mut self, content_type: &str) {
        self.content_type = Some(content_type.to_owned());
        self.encoding = charset_of(content_type);
        self.data_type = data_type_of(content_type);
    }

    /// Turns this sample into an error result, keeping its timing.
    #[must_use]
    pub fn into_error(mut self, error: &SampleError) -> Self {
        let kind = error.kind();
        self.sample_end();
        self.label = format!("Error: {}", self.url);
        self.response_code = format!("Non HTTP response code: {}", kind.as_str());
        self.response_message = format!("Non HTTP response message: {}", error);
        self.successful = false;
        self.set_response_body(error.chain().into_bytes());
        self.data_type = DataType::Text;
        self.failure = Some(SampleFailure {
            kind,
            message: error.to_string(),
        });
        self
    }

    /// Makes this result the parent of a redirect chain.
    ///
    /// Response fields are taken from the last hop; the time window spans
    /// the whole chain.
    pub fn adopt_chain(&mut self, hops: Vec<SampleResult>) {
        if let Some(last) = hops.last() {
            self.end_time = last.end_time.max(self.end_time);
            self.response_code.clone_from(&last.response_code);
            self.response_message.clone_from(&last.response_message);
            self.successful = last.successful;
            self.response_headers.clone_from(&last.response_headers);
            self.response_body.clone_from(&last.response_body);
            self.bytes = last.bytes;
            self.content_type.clone_from(&last.content_type);
            self.encoding.clone_from(&last.encoding);
            self.data_type = last.data_type;
            self.redirect_location.clone_from(&last.redirect_location);
            self.failure.clone_from(&last.failure);
        }
        self.clock = None;
        self.sub_results = hops;
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Success covers the 2xx and 3xx ranges.
#[must_use]
pub const fn is_success_code(code: u16) -> bool {
    matches!(code, 200..=399)
}

#[must_use]
pub const fn is_redirect_code(code: u16) -> bool {
    matches!(code, 301 | 302 | 303 | 307 | 308)
}

/// The reason phrase the server sent, or the canonical one for the code.
///
/// hyper only records a phrase that differs from the canonical reason.
#[must_use]
pub fn reason_phrase(status: StatusCode, sent: Option<&ReasonPhrase>) -> String {
    sent.map_or_else(
        || status.canonical_reason().unwrap_or_default().to_owned(),
        |reason| String::from_utf8_lossy(reason.as_bytes()).into_owned(),
    )
}

/// Renders the status line followed by one `name: value` line per header.
#[must_use]
pub fn format_response_headers(
    version: Version,
    status: StatusCode,
    reason: &str,
    headers: &HeaderMap,
) -> String {
    let mut buf = format!("{:?} {} {}\n", version, status.as_u16(), reason);
    for (name, value) in headers {
        drop(writeln!(
            buf,
            "{}: {}",
            name,
            String::from_utf8_lossy(value.as_bytes())
        ));
    }
    buf
}

/// Extracts the `charset` parameter of a content type, without quotes.
#[must_use]
pub fn charset_of(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        if !key.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        let value = value.trim().trim_matches('"');
        (!value.is_empty()).then(|| value.to_owned())
    })
}

#[must_use]
pub fn data_type_of(content_type: &str) -> DataType {
    let media = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    if media.is_empty() {
        return DataType::Unknown;
    }
    let textual = media.starts_with("text/")
        || media.ends_with("+xml")
        || media.ends_with("+json")
        || matches!(
            media.as_str(),
            "application/json"
                | "application/xml"
                | "application/javascript"
                | "application/x-javascript"
                | "application/ecmascript"
                | "application/x-www-form-urlencoded"
        );
    if textual { DataType::Text } else { DataType::Bin }
}
