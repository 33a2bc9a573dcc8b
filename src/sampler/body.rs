use encoding_rs::{Encoding, UTF_8, UTF_16BE, UTF_16LE};
use reqwest::Request;
use reqwest::header::{CONTENT_TYPE, HeaderValue};

use crate::error::SampleError;

/// Charset used when no content encoding is configured.
pub const DEFAULT_CHARSET: &Encoding = UTF_8;

/// What the body sender attached to the request.
#[derive(Debug)]
pub struct SentBody<'body> {
    /// The body as configured, before encoding.
    pub text: &'body str,
    /// The encoded entity bytes.
    pub encoded: Vec<u8>,
    /// The charset the entity bytes are actually in.
    pub charset: &'static Encoding,
}

/// Resolves a charset label; empty or missing labels select the default.
///
/// # Errors
///
/// Returns an error when the label names no known charset.
pub fn resolve_charset(label: Option<&str>) -> Result<&'static Encoding, SampleError> {
    match label.map(str::trim).filter(|label| !label.is_empty()) {
        None => Ok(DEFAULT_CHARSET),
        Some(label) => {
            Encoding::for_label(label.as_bytes()).ok_or_else(|| SampleError::UnsupportedCharset {
                label: label.to_owned(),
            })
        }
    }
}

/// Encodes `body` with the configured charset and attaches it as the entity.
///
/// # Errors
///
/// Returns an error when the charset label is unknown.
pub fn send_body<'body>(
    request: &mut Request,
    body: &'body str,
    encoding: Option<&str>,
) -> Result<SentBody<'body>, SampleError> {
    let charset = wire_charset(resolve_charset(encoding)?);
    let encoded = encode_body(body, charset);
    *request.body_mut() = Some(encoded.clone().into());
    Ok(SentBody {
        text: body,
        encoded,
        charset,
    })
}

/// The charset the bytes go out in. `encoding_rs` only decodes UTF-16 and
/// maps a few labels to UTF-8 on output.
fn wire_charset(charset: &'static Encoding) -> &'static Encoding {
    if charset == UTF_16LE || charset == UTF_16BE {
        charset
    } else {
        charset.output_encoding()
    }
}

fn encode_body(body: &str, charset: &'static Encoding) -> Vec<u8> {
    if charset == UTF_16LE {
        body.encode_utf16().flat_map(u16::to_le_bytes).collect()
    } else if charset == UTF_16BE {
        body.encode_utf16().flat_map(u16::to_be_bytes).collect()
    } else {
        let (encoded, _, _) = charset.encode(body);
        encoded.into_owned()
    }
}

/// Labels the entity as `text/plain` in its charset unless a content type
/// was supplied explicitly.
pub fn default_content_type(request: &mut Request, charset: &'static Encoding) {
    if request.headers().contains_key(CONTENT_TYPE) {
        return;
    }
    let value = format!("text/plain; charset={}", charset.name());
    if let Ok(value) = HeaderValue::from_str(&value) {
        request.headers_mut().insert(CONTENT_TYPE, value);
    }
}
