use std::io::Write;
use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use restsampler::args::{OutputFormat, PositiveUsize};
use restsampler::error::AppResult;
use restsampler::sampler::{SampleResult, Sampler};

use super::output::write_result;

/// Takes `repeat` samples with at most `concurrency` in flight and writes
/// each result to `out` as it completes. Returns the number of failed
/// samples.
///
/// When writing fails, samples still pending are aborted before the error
/// is returned.
pub(super) async fn run_samples<W: Write>(
    sampler: Sampler,
    repeat: PositiveUsize,
    concurrency: PositiveUsize,
    format: OutputFormat,
    out: &mut W,
) -> AppResult<usize> {
    debug!(
        "Sampling {} {} time(s), concurrency {}",
        sampler.url(),
        repeat.get(),
        concurrency.get()
    );
    let sampler = Arc::new(sampler);
    let permits = Arc::new(Semaphore::new(concurrency.get()));
    let (results_tx, mut results_rx) = mpsc::channel::<(usize, SampleResult)>(concurrency.get());
    let mut handles = Vec::with_capacity(repeat.get());

    for index in 0..repeat.get() {
        let permits = Arc::clone(&permits);
        let sampler = Arc::clone(&sampler);
        let results_tx = results_tx.clone();
        handles.push(tokio::spawn(async move {
            let Ok(_permit) = permits.acquire_owned().await else {
                return;
            };
            let result = sampler.sample_spec().await;
            if results_tx.send((index, result)).await.is_err() {
                warn!("Result receiver closed; dropping sample {}", index);
            }
        }));
    }
    drop(results_tx);

    let mut failed: usize = 0;
    while let Some((index, result)) = results_rx.recv().await {
        if !result.successful {
            failed = failed.saturating_add(1);
        }
        if let Err(err) = write_result(out, index, &result, format) {
            abort_all(handles).await;
            return Err(err);
        }
    }

    for handle in handles {
        handle.await?;
    }
    Ok(failed)
}

async fn abort_all(handles: Vec<JoinHandle<()>>) {
    for handle in &handles {
        handle.abort();
    }
    for handle in handles {
        if let Err(err) = handle.await
            && !err.is_cancelled()
        {
            warn!("Sample task failed while aborting: {}", err);
        }
    }
}
