use clap::Parser;
use std::time::Duration;

use crate::sampler::DEFAULT_MAX_REDIRECTS;

use super::defaults::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_METHOD, DEFAULT_TIMEOUT};
use super::parsers::{parse_duration_arg, parse_positive_usize};
use super::types::{OutputFormat, PositiveUsize};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "REST request sampler - issues an HTTP request per sample and reports timing, status, headers, body, redirects and cookies."
)]
pub struct SamplerArgs {
    /// Base host URL (e.g., http://localhost:8080/); one trailing slash is dropped
    #[arg(long = "base-host", short = 'b', env = "RESTSAMPLER_BASE_HOST")]
    pub base_host: Option<String>,

    /// Resource path appended to the base host (e.g., /api/users)
    #[arg(long = "resource", short = 'r')]
    pub resource: Option<String>,

    /// Query string appended to the resource (without the leading '?')
    #[arg(long = "query", short = 'q')]
    pub query_string: Option<String>,

    /// HTTP method: GET, POST, PUT, HEAD, TRACE, OPTIONS or DELETE (others are sent as GET)
    #[arg(long = "method", short = 'X', default_value = DEFAULT_METHOD)]
    pub method: String,

    /// Request body for POST/PUT
    #[arg(long = "body", short = 'd', conflicts_with = "body_file")]
    pub body: Option<String>,

    /// Read the request body from a file
    #[arg(long = "body-file")]
    pub body_file: Option<String>,

    /// Request header line, 'Name: value' or 'Name=value' (repeatable)
    #[arg(long = "header", short = 'H')]
    pub headers: Vec<String>,

    /// Read additional request header lines from a file
    #[arg(long = "headers-file")]
    pub headers_file: Option<String>,

    /// Charset used to encode the request body (defaults to UTF-8)
    #[arg(long = "content-encoding")]
    pub content_encoding: Option<String>,

    /// Follow redirect responses hop by hop, recording each hop as a sub-result
    #[arg(long = "follow-redirects")]
    pub follow_redirects: bool,

    /// Let the HTTP client follow redirects transparently
    #[arg(long = "auto-redirects", conflicts_with = "follow_redirects")]
    pub auto_redirects: bool,

    /// Maximum number of redirects to follow
    #[arg(long = "max-redirects", default_value_t = DEFAULT_MAX_REDIRECTS)]
    pub max_redirects: u32,

    /// Request timeout (supports ms/s/m/h)
    #[arg(long = "timeout", default_value = DEFAULT_TIMEOUT, value_parser = parse_duration_arg)]
    pub request_timeout: Duration,

    /// Connect timeout (supports ms/s/m/h)
    #[arg(long = "connect-timeout", default_value = DEFAULT_CONNECT_TIMEOUT, value_parser = parse_duration_arg)]
    pub connect_timeout: Duration,

    /// User-Agent header sent by default
    #[arg(long = "user-agent")]
    pub user_agent: Option<String>,

    /// Do not send a default User-Agent header
    #[arg(long = "no-ua", conflicts_with = "user_agent")]
    pub no_ua: bool,

    /// Keep cookies set by responses and send them on later samples
    #[arg(long = "cookies")]
    pub cookies: bool,

    /// Record cache validators (Last-Modified, ETag, ...) of GET responses
    #[arg(long = "cache")]
    pub cache: bool,

    /// Number of samples to take
    #[arg(long = "repeat", short = 'n', default_value = "1", value_parser = parse_positive_usize)]
    pub repeat: PositiveUsize,

    /// Maximum number of samples in flight at once
    #[arg(long = "concurrency", short = 'c', default_value = "1", value_parser = parse_positive_usize)]
    pub concurrency: PositiveUsize,

    /// Output format for sample results
    #[arg(long = "output-format", value_enum, default_value_t = OutputFormat::Text)]
    pub output_format: OutputFormat,

    /// Path to config file (TOML or JSON); restsampler.toml/json are used if present
    #[arg(long = "config")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(long = "verbose", short = 'v')]
    pub verbose: bool,
}
