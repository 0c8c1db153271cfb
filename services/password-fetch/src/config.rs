//! Configuration types and loading
//!
//! Config precedence: CLI args > env vars > config file > defaults.
//! The password is loaded from the PASSWORD_GRANT_PASSWORD env var or
//! password_file, never stored in the TOML directly to avoid leaking secrets.

use common::Secret;
use password_flow::{CredentialState, PasswordFlow};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Env var holding the password-grant password.
pub const PASSWORD_ENV: &str = "PASSWORD_GRANT_PASSWORD";

/// Root configuration
#[derive(Debug, Deserialize)]
pub struct Config {
    pub oauth: OAuthConfig,
    #[serde(default)]
    pub credentials: CredentialsConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// Token endpoint settings
#[derive(Debug, Deserialize)]
pub struct OAuthConfig {
    #[serde(flatten)]
    pub flow: PasswordFlow,
    /// Scope requested with the first password grant
    #[serde(default)]
    pub scope: Option<String>,
}

/// Resource owner credentials
#[derive(Debug, Default, Deserialize)]
pub struct CredentialsConfig {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(skip)]
    pub password: Option<Secret<String>>,
    /// Path to a file containing the password (alternative to the env var)
    #[serde(default)]
    pub password_file: Option<PathBuf>,
}

/// HTTP client settings
#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

impl Config {
    /// Load configuration from a TOML file, then overlay environment variables.
    ///
    /// Password resolution order:
    /// 1. PASSWORD_GRANT_PASSWORD env var
    /// 2. password_file path from config
    pub fn load(path: &Path) -> common::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&contents)?;

        config
            .oauth
            .flow
            .validate()
            .map_err(|e| common::Error::Config(e.to_string()))?;

        if config.http.timeout_secs == 0 {
            return Err(common::Error::Config(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if let Ok(password) = std::env::var(PASSWORD_ENV) {
            config.credentials.password = Some(Secret::new(password));
        } else if let Some(ref password_file) = config.credentials.password_file {
            let password = std::fs::read_to_string(password_file).map_err(|e| {
                common::Error::Config(format!(
                    "failed to read password_file {}: {e}",
                    password_file.display()
                ))
            })?;
            let password = password.trim().to_owned();
            if !password.is_empty() {
                config.credentials.password = Some(Secret::new(password));
            }
        }

        Ok(config)
    }

    /// Resolve config file path from CLI arg or CONFIG_PATH env var.
    pub fn resolve_path(cli_path: Option<&str>) -> PathBuf {
        if let Some(p) = cli_path {
            return PathBuf::from(p);
        }
        if let Ok(p) = std::env::var("CONFIG_PATH") {
            return PathBuf::from(p);
        }
        PathBuf::from("password-fetch.toml")
    }

    /// Initial credential state: username/password and the configured scope, no tokens.
    pub fn credential_state(&self) -> CredentialState {
        let password = self
            .credentials
            .password
            .as_ref()
            .map(|p| p.expose().clone());
        let state = CredentialState::new(self.credentials.username.clone(), password);
        match self.oauth.scope {
            Some(ref scope) => state.with_scope(scope.clone()),
            None => state,
        }
    }
}
