use clap::Parser;

use crate::error::{AppError, AppResult};

use super::SamplerArgs;

pub(crate) fn parse_test_args<I, T>(args: I) -> AppResult<SamplerArgs>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    SamplerArgs::try_parse_from(args).map_err(AppError::from)
}
