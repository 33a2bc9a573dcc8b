/// Config filenames checked in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILES: [&str; 2] = ["restsampler.toml", "restsampler.json"];

pub(crate) const DEFAULT_METHOD: &str = "GET";
pub(crate) const DEFAULT_TIMEOUT: &str = "30s";
pub(crate) const DEFAULT_CONNECT_TIMEOUT: &str = "10s";
