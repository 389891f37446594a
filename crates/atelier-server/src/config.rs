//! Server configuration, read once from the environment at startup.

use atelier_core::store::{DEFAULT_API_VERSION, SanityConfig};
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_BIND: &str = "0.0.0.0:3000";
pub const DEFAULT_PASSWORD: &str = "mySecret123";
pub const DEFAULT_COOKIE_NAME: &str = "sculpture_auth";
pub const DEFAULT_DATASET: &str = "production";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid ATELIER_BIND address {value:?}: {source}")]
    InvalidBind {
        value: String,
        source: std::net::AddrParseError,
    },
}

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind: SocketAddr,
    /// Shared admin credential.
    pub password: String,
    pub cookie_name: String,
    /// Key for signing session tokens.
    pub session_secret: String,
    pub sanity: Option<SanityConfig>,
    pub data_dir: Option<PathBuf>,
    pub resend_api_key: Option<String>,
    /// Sender and recipient of contact mail.
    pub resend_email: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let bind_value = var("ATELIER_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_value
            .parse()
            .map_err(|source| ConfigError::InvalidBind {
                value: bind_value.clone(),
                source,
            })?;

        let password = var("SIMPLE_PASSWORD").unwrap_or_else(|| DEFAULT_PASSWORD.to_string());
        let session_secret = var("SESSION_SECRET").unwrap_or_else(|| password.clone());

        let sanity = var("SANITY_PROJECT_ID").map(|project_id| {
            let mut sanity = SanityConfig::new(
                project_id,
                var("SANITY_DATASET").unwrap_or_else(|| DEFAULT_DATASET.to_string()),
            );
            sanity.api_version =
                var("SANITY_API_VERSION").unwrap_or_else(|| DEFAULT_API_VERSION.to_string());
            sanity.token = var("SANITY_API_TOKEN");
            sanity
        });

        Ok(Self {
            bind,
            password,
            cookie_name: var("COOKIE_NAME").unwrap_or_else(|| DEFAULT_COOKIE_NAME.to_string()),
            session_secret,
            sanity,
            data_dir: var("ATELIER_DATA_DIR").map(PathBuf::from),
            resend_api_key: var("RESEND_API_KEY"),
            resend_email: var("RESEND_EMAIL"),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 3000)),
            password: DEFAULT_PASSWORD.to_string(),
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            session_secret: DEFAULT_PASSWORD.to_string(),
            sanity: None,
            data_dir: None,
            resend_api_key: None,
            resend_email: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind.port(), 3000);
        assert_eq!(config.password, "mySecret123");
        assert_eq!(config.cookie_name, "sculpture_auth");
        assert_eq!(config.session_secret, config.password);
        assert!(config.sanity.is_none());
        assert!(config.resend_email.is_none());
    }

    #[test]
    fn test_sanity_settings() {
        let config = Config::from_lookup(lookup(&[
            ("SANITY_PROJECT_ID", "abc123"),
            ("SANITY_API_TOKEN", "sk-test"),
            ("SIMPLE_PASSWORD", "hunter2"),
            ("SESSION_SECRET", ""),
        ]))
        .unwrap();
        let sanity = config.sanity.unwrap();
        assert_eq!(sanity.project_id, "abc123");
        assert_eq!(sanity.dataset, "production");
        assert_eq!(sanity.api_version, "2024-06-01");
        assert_eq!(sanity.token.as_deref(), Some("sk-test"));
        assert_eq!(config.session_secret, "hunter2");
    }

    #[test]
    fn test_bad_bind_address() {
        let err = Config::from_lookup(lookup(&[("ATELIER_BIND", "not-an-address")])).unwrap_err();
        assert!(err.to_string().contains("not-an-address"));
    }
}
