use async_trait::async_trait;

use super::Sampler;
use super::result::SampleResult;

/// Post-processing applied to every successfully assembled sample.
///
/// Implementations may replace the result, e.g. to follow redirects or
/// fetch embedded resources through `sampler`.
#[async_trait]
pub trait ResultProcessor: Send + Sync {
    async fn process(
        &self,
        sampler: &Sampler,
        following_redirect: bool,
        frame_depth: u32,
        result: SampleResult,
    ) -> SampleResult;
}

/// Returns results unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

#[async_trait]
impl ResultProcessor for Passthrough {
    async fn process(
        &self,
        _sampler: &Sampler,
        _following_redirect: bool,
        _frame_depth: u32,
        result: SampleResult,
    ) -> SampleResult {
        result
    }
}
