use std::sync::Arc;

use reqwest::cookie::Jar;

use crate::error::{AppError, AppResult, ValidationError};
use crate::sampler::{ClientSettings, DEFAULT_USER_AGENT, RequestSpec};

use super::SamplerArgs;

/// Builds the request specification, reading body and header files.
///
/// # Errors
///
/// Returns an error when a referenced body or header file cannot be read.
pub fn to_request_spec(args: &SamplerArgs) -> AppResult<RequestSpec> {
    let body = match args.body_file.as_deref() {
        Some(path) => Some(read_input("body", path)?),
        None => args.body.clone(),
    };

    let mut header_lines = args.headers.clone();
    if let Some(path) = args.headers_file.as_deref() {
        header_lines.extend(read_input("headers", path)?.lines().map(str::to_owned));
    }
    let headers = (!header_lines.is_empty()).then(|| header_lines.join("\n"));

    Ok(RequestSpec {
        base_host: args.base_host.clone(),
        resource: args.resource.clone(),
        query_string: args.query_string.clone(),
        method: args.method.clone(),
        body,
        headers,
        content_encoding: args.content_encoding.clone(),
    })
}

#[must_use]
pub fn to_client_settings(args: &SamplerArgs, cookie_jar: Option<Arc<Jar>>) -> ClientSettings {
    let user_agent = if args.no_ua {
        None
    } else {
        Some(
            args.user_agent
                .clone()
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_owned()),
        )
    };
    ClientSettings {
        auto_redirects: args.auto_redirects,
        max_redirects: args.max_redirects,
        timeout: args.request_timeout,
        connect_timeout: args.connect_timeout,
        user_agent,
        cookie_jar,
    }
}

fn read_input(what: &'static str, path: &str) -> AppResult<String> {
    std::fs::read_to_string(path).map_err(|err| {
        AppError::validation(ValidationError::ReadInputFile {
            what,
            path: path.to_owned(),
            source: err,
        })
    })
}
