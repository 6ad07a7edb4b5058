//! Environment configuration for the azmirror CLI.

use std::env;

use azmirror_core::{AppError, AppResult};
use azmirror_infrastructure::GraphApiConfig;
use tracing_subscriber::EnvFilter;

const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.microsoft.com";
const DEFAULT_LOGIN_BASE_URL: &str = "https://login.microsoftonline.com";

/// Directory connection settings loaded from the environment.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Tenant the client-credentials grant is issued against.
    pub tenant_id: String,
    /// Application (client) identifier used to authenticate.
    pub client_id: String,
    /// Client secret used to authenticate.
    pub client_secret: String,
    /// Base URL of the directory API.
    pub graph_base_url: String,
    /// Base URL of the token-issuing authority.
    pub login_base_url: String,
}

impl CliConfig {
    /// Loads the configuration from `AZMIRROR_*` environment variables.
    pub fn load() -> AppResult<Self> {
        let tenant_id = required_non_empty_env("AZMIRROR_TENANT_ID")?;
        let client_id = required_non_empty_env("AZMIRROR_CLIENT_ID")?;
        let client_secret = required_non_empty_env("AZMIRROR_CLIENT_SECRET")?;
        let graph_base_url = env_or_default("AZMIRROR_GRAPH_BASE_URL", DEFAULT_GRAPH_BASE_URL);
        let login_base_url = env_or_default("AZMIRROR_LOGIN_BASE_URL", DEFAULT_LOGIN_BASE_URL);

        Ok(Self {
            tenant_id,
            client_id,
            client_secret,
            graph_base_url,
            login_base_url,
        })
    }

    /// Returns the directory API settings for the infrastructure adapters.
    #[must_use]
    pub fn graph_api_config(&self) -> GraphApiConfig {
        GraphApiConfig {
            tenant_id: self.tenant_id.clone(),
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            graph_base_url: self.graph_base_url.clone(),
            login_base_url: self.login_base_url.clone(),
        }
    }
}

/// Initializes the tracing subscriber for CLI output.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_non_empty_env(name: &str) -> AppResult<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::Validation(format!("{name} is required")))
}

fn env_or_default(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_owned())
        .trim_end_matches('/')
        .to_owned()
}
