use async_trait::async_trait;
use tracing::debug;

use crate::error::SampleError;
use crate::sampler::{DEFAULT_MAX_REDIRECTS, ResultProcessor, SampleResult, Sampler};

/// Follows redirect responses hop by hop, recording each hop as a
/// sub-result of the original sample.
#[derive(Debug, Clone, Copy)]
pub struct RedirectFollower {
    max_redirects: u32,
}

impl RedirectFollower {
    #[must_use]
    pub const fn new(max_redirects: u32) -> Self {
        Self { max_redirects }
    }

    async fn follow(
        &self,
        sampler: &Sampler,
        frame_depth: u32,
        first: SampleResult,
    ) -> SampleResult {
        let mut parent = first.clone();
        let mut hops = Vec::new();
        let mut current = first;
        let mut redirects: u32 = 0;

        loop {
            let Some(location) = current
                .redirect_location
                .clone()
                .filter(|_| current.is_redirect())
            else {
                break;
            };
            let method = next_method(&current.http_method, current.status_code());
            let target = match current.url.join(&location) {
                Ok(target) => target,
                Err(err) => {
                    let error = SampleError::InvalidLocation {
                        location,
                        source: err,
                    };
                    let failed = SampleResult::failed(&current.url, &method, &error);
                    hops.push(std::mem::replace(&mut current, failed));
                    break;
                }
            };
            if redirects >= self.max_redirects {
                let error = SampleError::TooManyRedirects {
                    limit: self.max_redirects,
                };
                let failed = SampleResult::failed(&target, &method, &error);
                hops.push(std::mem::replace(&mut current, failed));
                break;
            }

            redirects = redirects.saturating_add(1);
            debug!("Following redirect {} to {} ({})", redirects, target, method);
            let next = sampler.sample(&target, &method, true, frame_depth).await;
            hops.push(std::mem::replace(&mut current, next));
        }

        hops.push(current);
        parent.adopt_chain(hops);
        parent
    }
}

impl Default for RedirectFollower {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_REDIRECTS)
    }
}

/// 303 switches to GET, as do 301/302 answers to a POST.
pub(super) fn next_method(method: &str, status: Option<u16>) -> String {
    match status {
        Some(303) if method != "HEAD" => "GET".to_owned(),
        Some(301 | 302) if method == "POST" => "GET".to_owned(),
        Some(_) | None => method.to_owned(),
    }
}

#[async_trait]
impl ResultProcessor for RedirectFollower {
    async fn process(
        &self,
        sampler: &Sampler,
        following_redirect: bool,
        frame_depth: u32,
        result: SampleResult,
    ) -> SampleResult {
        if following_redirect || !result.is_redirect() {
            return result;
        }
        self.follow(sampler, frame_depth, result).await
    }
}
