//! Startup configuration.
//!
//! Each secret is resolved from the process environment first, then from a
//! TOML secrets file. There are no built-in fallbacks: a missing value stops
//! the server from starting.

use std::collections::HashMap;
use std::path::Path;

use reqwest::Url;
use serde::Deserialize;

pub const SUPABASE_URL: &str = "SUPABASE_URL";
pub const SUPABASE_ANON_KEY: &str = "SUPABASE_ANON_KEY";
pub const DASHBOARD_PASSWORD: &str = "DASHBOARD_PASSWORD";
pub const DASHBOARD_BIND: &str = "DASHBOARD_BIND";
pub const DASHBOARD_SECRETS: &str = "DASHBOARD_SECRETS";
pub const SESSION_KEY: &str = "SESSION_KEY";

pub const DEFAULT_SECRETS_PATH: &str = "secrets.toml";
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set in the environment or the secrets file")]
    Missing(&'static str),

    #[error("{key} is invalid: {message}")]
    Invalid { key: &'static str, message: String },

    #[error("failed to read secrets file {path}: {message}")]
    SecretsFile { path: String, message: String },
}

/// Flat `KEY = "value"` table, the layout of a hosted-app secrets file.
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct SecretsFile {
    values: HashMap<String, toml::Value>,
}

impl SecretsFile {
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Read `path`. A file that does not exist is an empty store.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SecretsFile {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml(&content).map_err(|e| ConfigError::SecretsFile {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match self.values.get(key)? {
            toml::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

#[derive(Clone)]
pub struct DashboardConfig {
    pub supabase_url: String,
    pub supabase_key: String,
    pub dashboard_password: String,
    pub bind_addr: String,
    pub session_key: Option<String>,
}

impl DashboardConfig {
    /// Load `.env`, the secrets file and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            log::debug!("No .env loaded: {e}");
        }
        let env = |key: &str| std::env::var(key).ok();
        let secrets_path = env(DASHBOARD_SECRETS).unwrap_or_else(|| DEFAULT_SECRETS_PATH.to_string());
        let secrets = SecretsFile::load(Path::new(&secrets_path))?;
        Self::resolve(env, &secrets)
    }

    /// Resolve every setting from `env` first, then `secrets`.
    pub fn resolve<F>(env: F, secrets: &SecretsFile) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &'static str| -> Option<String> {
            env(key)
                .filter(|v| !v.trim().is_empty())
                .or_else(|| secrets.get(key).filter(|v| !v.trim().is_empty()))
                .map(|v| v.trim().to_string())
        };
        let require = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));

        let supabase_url = require(SUPABASE_URL)?;
        validate_url(&supabase_url)?;

        Ok(Self {
            supabase_url,
            supabase_key: require(SUPABASE_ANON_KEY)?,
            dashboard_password: require(DASHBOARD_PASSWORD)?,
            bind_addr: lookup(DASHBOARD_BIND).unwrap_or_else(|| DEFAULT_BIND.to_string()),
            session_key: env(SESSION_KEY).filter(|v| !v.is_empty()),
        })
    }
}

impl std::fmt::Debug for DashboardConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardConfig")
            .field("supabase_url", &self.supabase_url)
            .field("bind_addr", &self.bind_addr)
            .finish_non_exhaustive()
    }
}

fn validate_url(raw: &str) -> Result<(), ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::Invalid {
        key: SUPABASE_URL,
        message: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid {
            key: SUPABASE_URL,
            message: format!("unsupported scheme '{}'", url.scheme()),
        });
    }
    Ok(())
}
