use std::io::Write;

use restsampler::args::OutputFormat;
use restsampler::error::AppResult;
use restsampler::sampler::SampleResult;

pub(super) fn write_result<W: Write>(
    out: &mut W,
    index: usize,
    result: &SampleResult,
    format: OutputFormat,
) -> AppResult<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, result)?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            writeln!(out, "#{} {}", index.saturating_add(1), summary_line(result))?;
            for hop in &result.sub_results {
                writeln!(out, "    -> {}", summary_line(hop))?;
            }
        }
    }
    Ok(())
}

fn summary_line(result: &SampleResult) -> String {
    let verdict = if result.successful { "OK" } else { "FAIL" };
    let mut line = format!(
        "{} {} {} {} | {} ms (latency {} ms) | {} bytes | {}",
        result.http_method,
        result.label,
        result.response_code,
        result.response_message,
        result.elapsed_ms(),
        result.latency_ms,
        result.bytes,
        verdict
    );
    if let Some(location) = result.redirect_location.as_deref() {
        line.push_str(" | location ");
        line.push_str(location);
    }
    line
}
