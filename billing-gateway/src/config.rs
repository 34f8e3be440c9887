//! Startup configuration.
//!
//! Read once from an optional `configuration.*` file and the process
//! environment, validated, and handed to [`crate::startup::Application`].

use ::config::{Config as Cfg, Environment, File};
use secrecy::Secret;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

const PLACEHOLDER_SECRET: &str = "sk_test_...";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("failed to read configuration: {0}")]
    Source(#[from] ::config::ConfigError),
}

#[derive(Clone, Debug)]
pub struct Config {
    pub server: ServerConfig,
    pub stripe: StripeConfig,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    /// Alternative-payment credentials found in the environment. No route uses
    /// them; startup only warns.
    pub ignored_credentials: Vec<&'static str>,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Clone, Debug)]
pub struct StripeConfig {
    pub secret_key: Secret<String>,
    pub api_base_url: String,
    pub timeout: Duration,
}

/// Flat view of the environment before validation.
#[derive(Deserialize)]
struct RawSettings {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,
    stripe_secret_key: Option<String>,
    #[serde(default = "default_stripe_api_base")]
    stripe_api_base: String,
    #[serde(default = "default_stripe_timeout_secs")]
    stripe_timeout_secs: u64,
    paypal_client_id: Option<String>,
    paypal_client_secret: Option<String>,
    #[serde(default = "default_log_level")]
    log_level: String,
    otel_exporter_otlp_endpoint: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_stripe_api_base() -> String {
    "https://api.stripe.com/v1".to_string()
}

fn default_stripe_timeout_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load from `.env`, `configuration.*` and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_environment(Environment::default())
    }

    /// Load from an explicit variable map instead of the process environment.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::from_environment(Environment::default().source(Some(vars)))
    }

    fn from_environment(env: Environment) -> Result<Self, ConfigError> {
        let raw: RawSettings = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(env)
            .build()?
            .try_deserialize()?;

        raw.validate()
    }
}

impl RawSettings {
    fn validate(self) -> Result<Config, ConfigError> {
        let secret_key = match self.stripe_secret_key {
            Some(key) if key.trim().is_empty() => {
                return Err(ConfigError::Missing("STRIPE_SECRET_KEY"));
            }
            Some(key) if key == PLACEHOLDER_SECRET => {
                return Err(ConfigError::Invalid {
                    key: "STRIPE_SECRET_KEY",
                    reason: "placeholder value is not a usable credential".to_string(),
                });
            }
            Some(key) => key,
            None => return Err(ConfigError::Missing("STRIPE_SECRET_KEY")),
        };

        if self.stripe_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "STRIPE_TIMEOUT_SECS",
                reason: "must be greater than zero".to_string(),
            });
        }

        let api_base_url = self.stripe_api_base.trim_end_matches('/').to_string();
        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                key: "STRIPE_API_BASE",
                reason: format!("'{}' is not an http(s) URL", api_base_url),
            });
        }

        let mut ignored_credentials = Vec::new();
        if self.paypal_client_id.is_some_and(|v| !v.is_empty()) {
            ignored_credentials.push("PAYPAL_CLIENT_ID");
        }
        if self.paypal_client_secret.is_some_and(|v| !v.is_empty()) {
            ignored_credentials.push("PAYPAL_CLIENT_SECRET");
        }

        Ok(Config {
            server: ServerConfig {
                host: self.host,
                port: self.port,
            },
            stripe: StripeConfig {
                secret_key: Secret::new(secret_key),
                api_base_url,
                timeout: Duration::from_secs(self.stripe_timeout_secs),
            },
            log_level: self.log_level,
            otlp_endpoint: self.otel_exporter_otlp_endpoint.filter(|v| !v.is_empty()),
            ignored_credentials,
        })
    }
}
