use hyper::ext::ReasonPhrase;
use reqwest::Url;
use reqwest::header::{CONTENT_TYPE, LOCATION};
use tracing::{debug, error, trace};

use super::Sampler;
use super::body::{default_content_type, send_body};
use super::headers::apply_headers;
use super::method::{PreparedRequest, build};
use super::propagate::{ResponseAdapter, propagate_cache, propagate_cookies};
use super::response::read_response;
use super::result::{SampleResult, format_response_headers, reason_phrase};
use crate::error::{SampleError, SampleErrorKind};

/// Progress of one invocation, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SampleState {
    Started,
    BodySent,
    HeadersApplied,
    ResponseReceived,
    ContentRead,
    Finalized,
    ErrorArgument,
    ErrorIo,
}

impl SampleState {
    const fn failed(kind: SampleErrorKind) -> Self {
        match kind {
            SampleErrorKind::Configuration => SampleState::ErrorArgument,
            SampleErrorKind::Transport => SampleState::ErrorIo,
        }
    }
}

fn advance(state: &mut SampleState, next: SampleState) {
    trace!("sample state {:?} -> {:?}", state, next);
    *state = next;
}

impl Sampler {
    /// Issues one request and captures it as a sample.
    ///
    /// Never fails: errors are folded into the returned result, which
    /// always carries a label and a closed timing window.
    pub async fn sample(
        &self,
        url: &Url,
        method: &str,
        following_redirect: bool,
        frame_depth: u32,
    ) -> SampleResult {
        debug!("Start : sample {}", url);
        debug!("method {}", method);

        let mut result = SampleResult::started(url, method);
        let mut state = SampleState::Started;
        match self.exchange(url, method, &mut result, &mut state).await {
            Ok(()) => {
                let result = self
                    .processor
                    .process(self, following_redirect, frame_depth, result)
                    .await;
                debug!("End : sample");
                result
            }
            Err(err) => {
                let reached = state;
                advance(&mut state, SampleState::failed(err.kind()));
                debug!("Sample of {} failed after {:?}: {}", url, reached, err);
                let mut failed = result.into_error(&err);
                failed.label = format!("Error: {}", url);
                failed
            }
        }
    }

    /// Samples the configured request.
    pub async fn sample_spec(&self) -> SampleResult {
        self.sample(&self.url, &self.spec.method, false, 0).await
    }

    async fn exchange(
        &self,
        url: &Url,
        method: &str,
        result: &mut SampleResult,
        state: &mut SampleState,
    ) -> Result<(), SampleError> {
        let PreparedRequest {
            method,
            mut request,
        } = build(method, url.clone());

        let mut charset = None;
        if method.is_entity_enclosing() {
            let sent = send_body(
                &mut request,
                self.spec.body.as_deref().unwrap_or_default(),
                self.spec.content_encoding.as_deref(),
            )?;
            result.sampler_data = Some(sent.text.to_owned());
            result.set_response_body(sent.encoded);
            charset = Some(sent.charset);
            advance(state, SampleState::BodySent);
        }

        apply_headers(self.spec.header_block(), &mut request);
        if let Some(charset) = charset {
            default_content_type(&mut request, charset);
        }
        self.spec
            .header_block()
            .clone_into(&mut result.request_headers);
        advance(state, SampleState::HeadersApplied);

        let response = match self.client.execute(request).await {
            Ok(response) => response,
            Err(err) if err.is_builder() => {
                error!("Exception when executing '{} {}': {}", method, url, err);
                return Err(SampleError::BuildRequest { source: err });
            }
            Err(err) => return Err(SampleError::Transport { source: err }),
        };
        result.latency_end();
        advance(state, SampleState::ResponseReceived);

        let status = response.status();
        let version = response.version();
        let reason = reason_phrase(status, response.extensions().get::<ReasonPhrase>());
        let headers = response.headers().clone();
        let final_url = response.url().clone();

        if let Some(content) = read_response(response, method).await? {
            result.set_response_body(content.bytes);
            advance(state, SampleState::ContentRead);
        }
        result.sample_end();

        result.label = final_url.to_string();
        result.set_status(status, &reason);
        if let Some(content_type) = headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
        {
            result.set_encoding_and_type(content_type);
        }
        result.response_headers = format_response_headers(version, status, &reason, &headers);

        if result.is_redirect() {
            let location = headers.get(LOCATION).ok_or(SampleError::MissingLocation)?;
            result.redirect_location =
                Some(String::from_utf8_lossy(location.as_bytes()).into_owned());
        }

        if self.auto_redirects {
            result.url = final_url;
        }

        propagate_cookies(&headers, &result.url, self.cookie_store.as_deref());
        propagate_cache(
            &ResponseAdapter::new(status, &headers, url),
            result,
            self.cache_store.as_deref(),
        );
        advance(state, SampleState::Finalized);
        Ok(())
    }
}
