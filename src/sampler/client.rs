use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::Jar;
use reqwest::{Client, redirect};
use tracing::error;

pub const DEFAULT_USER_AGENT: &str = concat!("restsampler/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_MAX_REDIRECTS: u32 = 5;

/// Transport-level knobs shared by every sample issued through one client.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Let the client follow redirects itself.
    pub auto_redirects: bool,
    pub max_redirects: u32,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: Option<String>,
    /// Jar the client reads cookies from when sending.
    pub cookie_jar: Option<Arc<Jar>>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            auto_redirects: false,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: Some(DEFAULT_USER_AGENT.to_owned()),
            cookie_jar: None,
        }
    }
}

/// Builds the HTTP client used by a sampler.
///
/// Transparent decompression stays off: the response reader decodes gzip
/// itself so the stored body reflects what the sampler decoded.
///
/// # Errors
///
/// Returns an error when the client cannot be constructed.
pub fn build_client(settings: &ClientSettings) -> Result<Client, reqwest::Error> {
    let mut client_builder = Client::builder()
        .timeout(settings.timeout)
        .connect_timeout(settings.connect_timeout)
        .no_gzip()
        .no_brotli()
        .no_deflate();

    if let Some(user_agent) = settings.user_agent.as_ref() {
        client_builder = client_builder.user_agent(user_agent.as_str());
    }

    client_builder = if settings.auto_redirects {
        client_builder.redirect(redirect::Policy::limited(
            usize::try_from(settings.max_redirects).unwrap_or(DEFAULT_MAX_REDIRECTS as usize),
        ))
    } else {
        client_builder.redirect(redirect::Policy::none())
    };

    if let Some(jar) = settings.cookie_jar.as_ref() {
        client_builder = client_builder.cookie_provider(Arc::clone(jar));
    }

    client_builder.build().map_err(|err| {
        error!("Failed to build HTTP client: {}", err);
        err
    })
}
