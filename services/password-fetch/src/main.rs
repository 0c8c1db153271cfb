//! password-fetch
//!
//! Sends one GET request through the password-grant middleware and writes
//! the response body to stdout:
//! 1. Loads the token endpoint and credentials from TOML (+ env overlay)
//! 2. Logs in lazily: the first 401 triggers the password grant
//! 3. Exits non-zero if the final response is not a success

mod config;

use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use auth_middleware::AuthenticatedClient;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

const USAGE: &str = "usage: password-fetch [--config PATH] URL";

/// Command line: optional `--config PATH` and exactly one URL.
#[derive(Debug, PartialEq, Eq)]
struct Args<'a> {
    config: Option<&'a str>,
    url: &'a str,
}

fn parse_args(args: &[String]) -> Result<Args<'_>> {
    let mut config = None;
    let mut url = None;
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter.next().context("--config requires a path")?;
                config = Some(path.as_str());
            }
            other if url.is_none() => url = Some(other),
            other => bail!("unexpected argument {other}\n{USAGE}"),
        }
    }
    let url = url.context(USAGE)?;
    Ok(Args { config, url })
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only the response body
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_env("LOG_LEVEL")
                .or_else(|_| EnvFilter::try_from_default_env())
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
        .init();

    let raw_args: Vec<String> = std::env::args().collect();
    let args = parse_args(&raw_args)?;

    let config_path = Config::resolve_path(args.config);
    info!(path = %config_path.display(), "loading configuration");

    let config = Config::load(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    info!(
        token_url = %config.oauth.flow.token_url,
        refresh_url = %config.oauth.flow.refresh_endpoint(),
        username = config.credentials.username.as_deref().unwrap_or("<none>"),
        has_password = config.credentials.password.is_some(),
        "configuration loaded"
    );

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http.timeout_secs))
        .build()
        .context("failed to build HTTP client")?;

    let client = AuthenticatedClient::new(http, config.oauth.flow.clone(), config.credential_state());

    let request = client
        .request(reqwest::Method::GET, args.url)
        .build()
        .with_context(|| format!("invalid request URL {}", args.url))?;
    let response = client
        .execute(request)
        .await
        .with_context(|| format!("request to {} failed", args.url))?;

    let status = response.status();
    info!(status = status.as_u16(), url = args.url, "request completed");

    let body = response.bytes().await.context("failed to read response body")?;
    std::io::stdout()
        .write_all(&body)
        .context("failed to write response body")?;

    if !status.is_success() {
        bail!("server responded with {status}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("password-fetch")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn parses_url_only() {
        let raw = args(&["https://api.example.com/items"]);
        assert_eq!(
            parse_args(&raw).unwrap(),
            Args {
                config: None,
                url: "https://api.example.com/items"
            }
        );
    }

    #[test]
    fn parses_config_before_or_after_url() {
        let raw = args(&["--config", "/etc/pf.toml", "https://api.example.com"]);
        assert_eq!(parse_args(&raw).unwrap().config, Some("/etc/pf.toml"));

        let raw = args(&["https://api.example.com", "--config", "/etc/pf.toml"]);
        let parsed = parse_args(&raw).unwrap();
        assert_eq!(parsed.config, Some("/etc/pf.toml"));
        assert_eq!(parsed.url, "https://api.example.com");
    }

    #[test]
    fn missing_url_is_an_error() {
        let raw = args(&["--config", "/etc/pf.toml"]);
        let err = parse_args(&raw).unwrap_err();
        assert!(err.to_string().contains("usage"), "got: {err}");
    }

    #[test]
    fn config_flag_without_value_is_an_error() {
        let raw = args(&["https://api.example.com", "--config"]);
        assert!(parse_args(&raw).is_err());
    }

    #[test]
    fn extra_positional_is_an_error() {
        let raw = args(&["https://a.example.com", "https://b.example.com"]);
        assert!(parse_args(&raw).is_err());
    }
}
