use std::io::Write;

use flate2::write::GzDecoder;
use futures_util::StreamExt;
use reqwest::header::{CONTENT_ENCODING, HeaderMap};
use reqwest::{Response, StatusCode};

use super::method::HttpMethod;
use crate::error::SampleError;

/// Upper bound on the buffer pre-allocated from a declared content length.
const MAX_PREALLOCATED_BODY: u64 = 8 * 1024 * 1024;

/// Entity bytes as stored on the sample, already decompressed.
#[derive(Debug, Default)]
pub struct ResponseContent {
    pub bytes: Vec<u8>,
    /// Declared length of the entity on the wire; `None` when unknown.
    pub content_length: Option<u64>,
}

/// HEAD answers, informational, 204 and 304 responses carry no entity.
#[must_use]
pub fn has_entity(method: HttpMethod, status: StatusCode) -> bool {
    !(method == HttpMethod::Head
        || status.is_informational()
        || status == StatusCode::NO_CONTENT
        || status == StatusCode::NOT_MODIFIED)
}

#[must_use]
pub fn is_gzip(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_ENCODING)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.trim().eq_ignore_ascii_case("gzip"))
}

enum BodySink {
    Plain(Vec<u8>),
    Gzip(GzDecoder<Vec<u8>>),
}

impl BodySink {
    fn new(gzip: bool, capacity: usize) -> Self {
        let buffer = Vec::with_capacity(capacity);
        if gzip {
            BodySink::Gzip(GzDecoder::new(buffer))
        } else {
            BodySink::Plain(buffer)
        }
    }

    fn write(&mut self, chunk: &[u8]) -> Result<(), SampleError> {
        match self {
            BodySink::Plain(buffer) => {
                buffer.extend_from_slice(chunk);
                Ok(())
            }
            BodySink::Gzip(decoder) => decoder
                .write_all(chunk)
                .map_err(|err| SampleError::Decompress { source: err }),
        }
    }

    fn finish(self) -> Result<Vec<u8>, SampleError> {
        match self {
            BodySink::Plain(buffer) => Ok(buffer),
            BodySink::Gzip(decoder) => decoder
                .finish()
                .map_err(|err| SampleError::Decompress { source: err }),
        }
    }
}

/// Reads the whole entity of `response`, decompressing gzip on the fly.
///
/// Returns `None` without touching the stream when the response has no
/// entity. The response is consumed, so its connection is released on
/// every return path.
///
/// # Errors
///
/// Returns an error when the body stream fails or gzip data is corrupt.
pub async fn read_response(
    response: Response,
    method: HttpMethod,
) -> Result<Option<ResponseContent>, SampleError> {
    if !has_entity(method, response.status()) {
        return Ok(None);
    }

    let content_length = response.content_length();
    let capacity = content_length
        .map(|len| len.min(MAX_PREALLOCATED_BODY))
        .and_then(|len| usize::try_from(len).ok())
        .unwrap_or_default();
    let mut sink = BodySink::new(is_gzip(response.headers()), capacity);

    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let bytes = chunk.map_err(|err| SampleError::ReadBody { source: err })?;
        sink.write(&bytes)?;
    }

    Ok(Some(ResponseContent {
        bytes: sink.finish()?,
        content_length,
    }))
}
