use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use std::path::{Path, PathBuf};
use std::time::Duration;
use unsplash_api::urls::{DEFAULT_API_BASE, DEFAULT_CALLBACK_SCHEME, DEFAULT_OAUTH_BASE};
use unsplash_api::{ApiUrls, Credentials, Scope};

/// Default location of the persisted token file.
pub const DEFAULT_TOKEN_STORE_PATH: &str = "unsplasher-tokens.json";

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// The Unsplash application ID (access key) registered for this client.
    #[arg(long, env = "UNSPLASH_APPLICATION_ID")]
    application_id: Option<String>,

    /// The Unsplash application secret. Only needed to log in.
    #[arg(long, env = "UNSPLASH_SECRET", hide_env_values = true)]
    secret: Option<String>,

    /// A comma separated list of scopes to request, e.g. `read_user,write_likes`.
    /// The public scope is always included.
    #[arg(long, env = "UNSPLASH_SCOPES", value_delimiter = ',', use_value_delimiter = true)]
    scopes: Vec<Scope>,

    /// Base URL of the Unsplash REST API.
    /// Override in tests to point at a mock server.
    #[arg(long, env = "UNSPLASH_API_BASE_URL", default_value = DEFAULT_API_BASE)]
    api_base_url: String,

    /// Base URL of the Unsplash OAuth endpoints.
    #[arg(long, env = "UNSPLASH_OAUTH_BASE_URL", default_value = DEFAULT_OAUTH_BASE)]
    oauth_base_url: String,

    /// Scheme prefix of the redirect URI, registered as `<scheme>-<application id>://token`.
    #[arg(long, env = "UNSPLASH_CALLBACK_SCHEME", default_value = DEFAULT_CALLBACK_SCHEME)]
    callback_scheme: String,

    /// File the access token is persisted to between runs.
    #[arg(long, env = "UNSPLASH_TOKEN_STORE_PATH", default_value = DEFAULT_TOKEN_STORE_PATH)]
    token_store_path: PathBuf,

    /// Hex encoded 32 byte key. When set, token values are encrypted at rest.
    #[arg(long, env = "UNSPLASH_TOKEN_ENCRYPTION_KEY", hide_env_values = true)]
    token_encryption_key: Option<String>,

    /// Timeout in seconds for a single API request
    #[arg(long, env = "UNSPLASH_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        load_env();
        Config::parse()
    }

    pub fn application_id(&self) -> Option<&str> {
        self.application_id.as_deref()
    }

    pub fn set_application_id(mut self, application_id: String) -> Self {
        self.application_id = Some(application_id);
        self
    }

    pub fn secret(&self) -> Option<String> {
        self.secret.clone()
    }

    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    /// Credentials built from the configured application id, secret and scopes.
    /// `None` when no application id is configured.
    pub fn credentials(&self) -> Option<Credentials> {
        self.application_id().map(|application_id| {
            Credentials::new(application_id, self.secret(), self.scopes.iter().copied())
        })
    }

    pub fn api_urls(&self) -> ApiUrls {
        ApiUrls::new(&self.api_base_url, &self.oauth_base_url)
            .with_callback_scheme(&self.callback_scheme)
    }

    pub fn token_store_path(&self) -> &Path {
        &self.token_store_path
    }

    pub fn set_token_store_path(mut self, path: PathBuf) -> Self {
        self.token_store_path = path;
        self
    }

    pub fn token_encryption_key(&self) -> Option<&str> {
        self.token_encryption_key.as_deref()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Loads a `.env` file into the process environment, if one exists.
///
/// Call before parsing anything that flattens [`Config`].
pub fn load_env() {
    dotenv().ok();
}
