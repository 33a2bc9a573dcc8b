use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{PositiveUsize, SamplerArgs};
use crate::error::ConfigError;

use super::types::ConfigFile;

/// Applies configuration values to CLI arguments.
///
/// Values given explicitly on the command line (or through an environment
/// variable) win over the file.
///
/// # Errors
///
/// Returns an error when config values are invalid or conflict.
pub fn apply_config(
    args: &mut SamplerArgs,
    matches: &ArgMatches,
    config: ConfigFile,
) -> Result<(), ConfigError> {
    if config.body.is_some() && config.body_file.is_some() {
        return Err(ConfigError::Conflict {
            left: "body",
            right: "body_file",
        });
    }
    set_if_unset(matches, "base_host", &mut args.base_host, config.base_host.map(Some));
    set_if_unset(matches, "resource", &mut args.resource, config.resource.map(Some));
    set_if_unset(
        matches,
        "query_string",
        &mut args.query_string,
        config.query_string.map(Some),
    );
    set_if_unset(matches, "method", &mut args.method, config.method);
    if !is_cli(matches, "body") && !is_cli(matches, "body_file") {
        if let Some(body) = config.body {
            args.body = Some(body);
        }
        if let Some(path) = config.body_file {
            args.body_file = Some(path);
        }
    }
    set_if_unset(
        matches,
        "headers",
        &mut args.headers,
        config.headers.map(|headers| headers.into_lines()),
    );
    set_if_unset(
        matches,
        "headers_file",
        &mut args.headers_file,
        config.headers_file.map(Some),
    );
    set_if_unset(
        matches,
        "content_encoding",
        &mut args.content_encoding,
        config.content_encoding.map(Some),
    );
    set_if_unset(
        matches,
        "follow_redirects",
        &mut args.follow_redirects,
        config.follow_redirects,
    );
    set_if_unset(
        matches,
        "auto_redirects",
        &mut args.auto_redirects,
        config.auto_redirects,
    );
    set_if_unset(
        matches,
        "max_redirects",
        &mut args.max_redirects,
        config.max_redirects,
    );

    if !is_cli(matches, "request_timeout")
        && let Some(timeout) = config.timeout.as_ref()
    {
        args.request_timeout =
            timeout
                .to_duration()
                .map_err(|err| ConfigError::InvalidDuration {
                    field: "timeout",
                    source: err,
                })?;
    }
    if !is_cli(matches, "connect_timeout")
        && let Some(timeout) = config.connect_timeout.as_ref()
    {
        args.connect_timeout =
            timeout
                .to_duration()
                .map_err(|err| ConfigError::InvalidDuration {
                    field: "connect_timeout",
                    source: err,
                })?;
    }

    set_if_unset(
        matches,
        "user_agent",
        &mut args.user_agent,
        config.user_agent.map(Some),
    );
    set_if_unset(matches, "no_ua", &mut args.no_ua, config.no_ua);
    set_if_unset(matches, "cookies", &mut args.cookies, config.cookies);
    set_if_unset(matches, "cache", &mut args.cache, config.cache);

    if !is_cli(matches, "repeat")
        && let Some(repeat) = config.repeat
    {
        args.repeat = ensure_positive_usize(repeat, "repeat")?;
    }
    if !is_cli(matches, "concurrency")
        && let Some(concurrency) = config.concurrency
    {
        args.concurrency = ensure_positive_usize(concurrency, "concurrency")?;
    }

    set_if_unset(
        matches,
        "output_format",
        &mut args.output_format,
        config.output_format,
    );

    check_merged_conflicts(args)
}

/// Pairs clap keeps apart on the command line can still meet once the
/// config file fills the other side.
const fn check_merged_conflicts(args: &SamplerArgs) -> Result<(), ConfigError> {
    if args.body.is_some() && args.body_file.is_some() {
        return Err(ConfigError::Conflict {
            left: "body",
            right: "body_file",
        });
    }
    if args.follow_redirects && args.auto_redirects {
        return Err(ConfigError::Conflict {
            left: "follow_redirects",
            right: "auto_redirects",
        });
    }
    Ok(())
}

fn set_if_unset<T>(matches: &ArgMatches, id: &str, target: &mut T, value: Option<T>) {
    if is_cli(matches, id) {
        return;
    }
    if let Some(value) = value {
        *target = value;
    }
}

fn is_cli(matches: &ArgMatches, id: &str) -> bool {
    matches!(
        matches.value_source(id),
        Some(ValueSource::CommandLine | ValueSource::EnvVariable)
    )
}

fn ensure_positive_usize(value: usize, field: &'static str) -> Result<PositiveUsize, ConfigError> {
    PositiveUsize::try_from(value)
        .map_err(|err| ConfigError::FieldMustBePositive { field, source: err })
}
