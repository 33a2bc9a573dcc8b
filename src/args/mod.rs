//! CLI argument types and parsing helpers.
mod cli;
mod defaults;
mod mapper;
pub(crate) mod parsers;
mod types;

#[cfg(test)]
mod test_support;

pub use cli::SamplerArgs;
pub use mapper::{to_client_settings, to_request_spec};
pub use types::{OutputFormat, PositiveUsize};

pub use defaults::DEFAULT_CONFIG_FILES;
