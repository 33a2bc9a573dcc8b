mod app;
mod config;
mod sample;
mod validation;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use sample::{SampleError, SampleErrorKind};
pub use validation::ValidationError;
