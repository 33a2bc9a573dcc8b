mod entry;

use std::process::ExitCode;

use restsampler::error::AppResult;

fn main() -> AppResult<ExitCode> {
    entry::run()
}
