mod output;
mod runner;

use std::ffi::OsString;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{ArgMatches, CommandFactory, FromArgMatches};
use reqwest::cookie::Jar;
use tracing::error;

use restsampler::args::{
    DEFAULT_CONFIG_FILES, SamplerArgs, to_client_settings, to_request_spec,
};
use restsampler::error::{AppError, AppResult, ValidationError};
use restsampler::sampler::{Sampler, build_client};
use restsampler::stores::{MemoryCache, RedirectFollower};

pub(crate) fn run() -> AppResult<ExitCode> {
    let (args, matches) = match parse_args()? {
        Some(parsed) => parsed,
        None => return Ok(ExitCode::SUCCESS),
    };

    restsampler::logger::init_logging(args.verbose);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::validation(ValidationError::RuntimeBuildFailed { source: err }))?;

    match runtime.block_on(run_async(args, &matches)) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(AppError::Validation(err @ ValidationError::SamplesFailed { .. })) => {
            error!("{}", err);
            Ok(ExitCode::FAILURE)
        }
        Err(err) => Err(err),
    }
}

fn parse_args() -> AppResult<Option<(SamplerArgs, ArgMatches)>> {
    let mut cmd = SamplerArgs::command();
    let raw_args: Vec<OsString> = std::env::args_os().collect();

    if should_show_help(&raw_args) {
        cmd.print_help()?;
        println!();
        return Ok(None);
    }

    let matches = cmd.get_matches_from(raw_args);
    let args = SamplerArgs::from_arg_matches(&matches)?;

    Ok(Some((args, matches)))
}

/// Bare invocations print help unless a default config file can drive the run.
fn should_show_help(raw_args: &[OsString]) -> bool {
    let treat_as_empty =
        matches!(raw_args, [] | [_]) || matches!(raw_args, [_, second] if second == "--");
    if !treat_as_empty {
        return false;
    }

    !DEFAULT_CONFIG_FILES
        .iter()
        .any(|path| Path::new(path).exists())
}

async fn run_async(mut args: SamplerArgs, matches: &ArgMatches) -> AppResult<()> {
    if let Some(config) = restsampler::config::load_config(args.config.as_deref())? {
        restsampler::config::apply_config(&mut args, matches, config)?;
    }

    let spec = to_request_spec(&args)?;
    let cookie_jar = args.cookies.then(|| Arc::new(Jar::default()));
    let client = build_client(&to_client_settings(&args, cookie_jar.clone()))?;

    let mut sampler = Sampler::new(client, spec)?.with_auto_redirects(args.auto_redirects);
    if let Some(jar) = cookie_jar {
        sampler = sampler.with_cookie_store(jar);
    }
    if args.cache {
        sampler = sampler.with_cache_store(Arc::new(MemoryCache::new()));
    }
    if args.follow_redirects {
        sampler = sampler.with_result_processor(Arc::new(RedirectFollower::new(args.max_redirects)));
    }

    let total = args.repeat.get();
    let failed = runner::run_samples(
        sampler,
        args.repeat,
        args.concurrency,
        args.output_format,
        &mut std::io::stdout(),
    )
    .await?;
    if failed > 0 {
        return Err(AppError::validation(ValidationError::SamplesFailed {
            failed,
            total,
        }));
    }
    Ok(())
}
