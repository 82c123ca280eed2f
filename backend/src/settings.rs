//! Server settings loaded via OrthoConfig.
//!
//! Values come from `TRACKER_*` environment variables, an optional config
//! file, and command-line flags. Session cookie settings are resolved
//! separately by [`crate::inbound::http::session_config`].

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
const DEFAULT_IDENTITY_TIMEOUT_SECS: u64 = 10;
const DEFAULT_FIXTURE_PASSWORD: &str = "tracker-dev";

/// Failures while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TRACKER_BIND_ADDRESS is not a socket address: {value}")]
    BindAddress { value: String },
    #[error("TRACKER_IDENTITY_ENDPOINT is not a URL: {message}")]
    IdentityEndpoint { message: String },
    #[error("TRACKER_IDENTITY_ENDPOINT and TRACKER_IDENTITY_API_KEY must be set together")]
    PartialIdentityProvider,
}

/// Where sign-in requests are verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthBackend {
    /// Identity Toolkit REST API.
    IdentityToolkit {
        endpoint: url::Url,
        api_key: String,
        timeout: Duration,
    },
    /// In-process accounts; seeded with development logins when enabled.
    Fixture { seed_accounts: bool },
}

/// Configuration values for the tracker server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TRACKER")]
pub struct TrackerSettings {
    /// Socket address the HTTP listener binds to.
    pub bind_address: Option<String>,
    /// PostgreSQL URL. Without it documents live in process memory.
    pub database_url: Option<String>,
    /// Identity Toolkit base URL, e.g. `https://identitytoolkit.googleapis.com/v1/`.
    pub identity_endpoint: Option<String>,
    /// Web API key for the Identity Toolkit.
    pub identity_api_key: Option<String>,
    /// Request timeout for the Identity Toolkit in seconds.
    pub identity_timeout_secs: Option<u64>,
    /// Seed development accounts when no identity provider is configured.
    #[ortho_config(default = false)]
    pub fixture_accounts: bool,
    /// Password shared by the seeded development accounts.
    pub fixture_password: Option<String>,
}

impl TrackerSettings {
    /// Parse the configured bind address, falling back to `0.0.0.0:8080`.
    pub fn bind_address(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self
            .bind_address
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDRESS);
        raw.parse().map_err(|_| SettingsError::BindAddress {
            value: raw.to_owned(),
        })
    }

    /// Decide which auth provider backs sign-in.
    pub fn auth_backend(&self) -> Result<AuthBackend, SettingsError> {
        match (&self.identity_endpoint, &self.identity_api_key) {
            (Some(endpoint), Some(api_key)) => {
                let endpoint = url::Url::parse(endpoint).map_err(|err| {
                    SettingsError::IdentityEndpoint {
                        message: err.to_string(),
                    }
                })?;
                let secs = self
                    .identity_timeout_secs
                    .unwrap_or(DEFAULT_IDENTITY_TIMEOUT_SECS);
                Ok(AuthBackend::IdentityToolkit {
                    endpoint,
                    api_key: api_key.clone(),
                    timeout: Duration::from_secs(secs),
                })
            }
            (None, None) => Ok(AuthBackend::Fixture {
                seed_accounts: self.fixture_accounts,
            }),
            _ => Err(SettingsError::PartialIdentityProvider),
        }
    }

    /// Password for seeded development accounts.
    pub fn fixture_password(&self) -> &str {
        self.fixture_password
            .as_deref()
            .unwrap_or(DEFAULT_FIXTURE_PASSWORD)
    }
}
