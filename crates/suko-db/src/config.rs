//! Connection configuration for the hosted realtime database.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

/// Environment variables read by [`DatabaseConfig::from_env`], in the
/// order of the config fields.
pub const ENV_VARS: [&str; 7] = [
    "FIREBASE_API_KEY",
    "FIREBASE_AUTH_DOMAIN",
    "FIREBASE_DATABASE_URL",
    "FIREBASE_PROJECT_ID",
    "FIREBASE_STORAGE_BUCKET",
    "FIREBASE_MESSAGING_SENDER_ID",
    "FIREBASE_APP_ID",
];

/// Consulted when `FIREBASE_DATABASE_URL` is unset.
pub const DATABASE_URL_FALLBACK_VAR: &str = "DB_URL";

/// Legacy `*.firebaseio.com` and regional `*.firebasedatabase.app` hosts.
const DATABASE_URL_PATTERN: &str =
    r"^https://[a-zA-Z0-9.-]+\.(firebaseio\.com|firebasedatabase\.app)(/|$)";

/// Configuration errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Required variables are unset or empty.
    #[error("Missing required env vars: {}", .0.join(", "))]
    Missing(Vec<String>),

    /// The database URL is not a realtime database URL.
    #[error("Invalid FIREBASE_DATABASE_URL format: {0}")]
    InvalidDatabaseUrl(String),
}

/// Connection parameters, serialized with the hosted SDK's field names.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseConfig {
    pub api_key: String,
    pub auth_domain: String,
    #[serde(rename = "databaseURL")]
    pub database_url: String,
    pub project_id: String,
    pub storage_bucket: String,
    pub messaging_sender_id: String,
    pub app_id: String,
}

impl DatabaseConfig {
    /// Read the configuration through `lookup`, then validate it.
    ///
    /// Empty values count as missing. Every missing variable is reported,
    /// not just the first.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|v| !v.is_empty());

        let values: Vec<Option<String>> = ENV_VARS
            .iter()
            .map(|name| {
                let value = read(name);
                if *name == "FIREBASE_DATABASE_URL" {
                    value.or_else(|| read(DATABASE_URL_FALLBACK_VAR))
                } else {
                    value
                }
            })
            .collect();

        let missing: Vec<String> = ENV_VARS
            .iter()
            .zip(&values)
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        let mut values = values.into_iter().map(Option::unwrap_or_default);
        let mut next = || values.next().unwrap_or_default();
        let config = Self {
            api_key: next(),
            auth_domain: next(),
            database_url: next(),
            project_id: next(),
            storage_bucket: next(),
            messaging_sender_id: next(),
            app_id: next(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Check the database URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if is_valid_database_url(&self.database_url) {
            Ok(())
        } else {
            Err(ConfigError::InvalidDatabaseUrl(self.database_url.clone()))
        }
    }

    /// Environment document consumed by the storefront build:
    /// `{"production": bool, "firebase": {...}}`.
    pub fn environment_document(&self, production: bool) -> serde_json::Value {
        json!({
            "production": production,
            "firebase": self,
        })
    }
}

/// Check whether `url` points at a hosted realtime database.
pub fn is_valid_database_url(url: &str) -> bool {
    match Regex::new(DATABASE_URL_PATTERN) {
        Ok(pattern) => pattern.is_match(url),
        Err(e) => {
            tracing::error!(error = %e, "database url pattern failed to compile");
            false
        }
    }
}
