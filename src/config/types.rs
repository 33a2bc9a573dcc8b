use std::time::Duration;

use serde::Deserialize;

use crate::args::OutputFormat;
use crate::args::parsers::parse_duration_value;
use crate::error::ValidationError;

/// Settings accepted from `restsampler.toml` / `restsampler.json`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub base_host: Option<String>,
    pub resource: Option<String>,
    #[serde(alias = "query")]
    pub query_string: Option<String>,
    pub method: Option<String>,
    pub body: Option<String>,
    pub body_file: Option<String>,
    /// Header lines, or a single multi-line header block.
    pub headers: Option<HeaderLines>,
    pub headers_file: Option<String>,
    pub content_encoding: Option<String>,
    pub follow_redirects: Option<bool>,
    pub auto_redirects: Option<bool>,
    pub max_redirects: Option<u32>,
    pub timeout: Option<DurationValue>,
    pub connect_timeout: Option<DurationValue>,
    pub user_agent: Option<String>,
    pub no_ua: Option<bool>,
    pub cookies: Option<bool>,
    pub cache: Option<bool>,
    pub repeat: Option<usize>,
    pub concurrency: Option<usize>,
    pub output_format: Option<OutputFormat>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum HeaderLines {
    List(Vec<String>),
    Block(String),
}

impl HeaderLines {
    #[must_use]
    pub fn into_lines(self) -> Vec<String> {
        match self {
            HeaderLines::List(lines) => lines,
            HeaderLines::Block(block) => block.lines().map(str::to_owned).collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> Result<Duration, ValidationError> {
        match self {
            DurationValue::Seconds(secs) => {
                if *secs == 0 {
                    Err(ValidationError::DurationZero)
                } else {
                    Ok(Duration::from_secs(*secs))
                }
            }
            DurationValue::Text(text) => parse_duration_value(text),
        }
    }
}
