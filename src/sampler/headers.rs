use reqwest::Request;
use reqwest::header::{HeaderName, HeaderValue};
use tracing::warn;

/// Parses a raw header block, one `name: value` or `name=value` per line.
///
/// A `:` wins over `=` when both appear. Lines with no separator, or with
/// the separator in first position, are dropped.
#[must_use]
pub fn parse_header_block(raw: &str) -> Vec<(String, String)> {
    raw.lines().filter_map(parse_header_line).collect()
}

fn parse_header_line(line: &str) -> Option<(String, String)> {
    let pos = line.find(':').or_else(|| line.find('='))?;
    if pos == 0 {
        return None;
    }
    let (name, rest) = line.split_at(pos);
    if name.trim().is_empty() {
        return None;
    }
    let value = rest.get(1..).unwrap_or_default();
    Some((name.trim().to_owned(), value.trim().to_owned()))
}

/// Appends every header of the raw block to the request.
///
/// Headers are added, never replaced, so a name may repeat. Client-level
/// defaults with the same name are overridden by these at send time.
/// Pairs that are not legal HTTP tokens are skipped with a warning.
pub fn apply_headers(raw: &str, request: &mut Request) {
    for (name, value) in parse_header_block(raw) {
        let header_name = match HeaderName::from_bytes(name.as_bytes()) {
            Ok(header_name) => header_name,
            Err(err) => {
                warn!("Skipping header with invalid name '{}': {}", name, err);
                continue;
            }
        };
        match HeaderValue::from_str(&value) {
            Ok(header_value) => {
                request.headers_mut().append(header_name, header_value);
            }
            Err(err) => warn!("Skipping header '{}' with invalid value: {}", name, err),
        }
    }
}
