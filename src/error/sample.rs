use std::error::Error as _;

use thiserror::Error;

/// Broad classification used when a failed sample is turned into a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleErrorKind {
    /// The request could not be formed, or the response broke protocol rules.
    Configuration,
    /// Connect, send, read or decode failed.
    Transport,
}

impl SampleErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            SampleErrorKind::Configuration => "configuration",
            SampleErrorKind::Transport => "transport",
        }
    }
}

#[derive(Debug, Error)]
pub enum SampleError {
    #[error("Unsupported content encoding '{label}'.")]
    UnsupportedCharset { label: String },
    #[error("Failed to build request: {source}")]
    BuildRequest {
        #[source]
        source: reqwest::Error,
    },
    #[error("Missing location header")]
    MissingLocation,
    #[error("Invalid redirect location '{location}': {source}")]
    InvalidLocation {
        location: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Exceeded maximum number of redirects: {limit}")]
    TooManyRedirects { limit: u32 },
    #[error("Request failed: {source}")]
    Transport {
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to read response body: {source}")]
    ReadBody {
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to decompress gzip response: {source}")]
    Decompress {
        #[source]
        source: std::io::Error,
    },
}

impl SampleError {
    #[must_use]
    pub const fn kind(&self) -> SampleErrorKind {
        match self {
            SampleError::UnsupportedCharset { .. }
            | SampleError::BuildRequest { .. }
            | SampleError::MissingLocation
            | SampleError::InvalidLocation { .. } => SampleErrorKind::Configuration,
            SampleError::TooManyRedirects { .. }
            | SampleError::Transport { .. }
            | SampleError::ReadBody { .. }
            | SampleError::Decompress { .. } => SampleErrorKind::Transport,
        }
    }

    /// Renders the error with its full source chain, one cause per line.
    #[must_use]
    pub fn chain(&self) -> String {
        let mut rendered = self.to_string();
        let mut current = self.source();
        while let Some(cause) = current {
            rendered.push_str("\nCaused by: ");
            rendered.push_str(&cause.to_string());
            current = cause.source();
        }
        rendered
    }
}
