use std::env;
use thiserror::Error;

const PREFIX: &str = "SIMBORA_";

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(String),
    #[error("{key} has an invalid value: {value}")]
    Invalid { key: String, value: String },
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret_key: String, // Private key (PEM)
    pub jwt_public_key: String, // Public key (PEM)
    pub auth_issuer: String,
    pub log_dir: String,
    pub minimum_age: u32,
    pub secure_cookies: bool,
}

impl Config {
    /// Loads `.env` (if present) and reads every `SIMBORA_*` key from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(&format!("{PREFIX}{name}"));
        let require = |name: &str| get(name).ok_or_else(|| ConfigError::Missing(format!("{PREFIX}{name}")));

        Ok(Self {
            database_url: require("DATABASE_URL")?,
            port: parse_or(get("PORT"), "PORT", 3000)?,
            jwt_secret_key: require("JWT_SECRET_KEY")?,
            jwt_public_key: require("JWT_PUBLIC_KEY")?,
            auth_issuer: get("AUTH_ISSUER").unwrap_or_else(|| "https://api.simbora.local".to_string()),
            log_dir: get("LOG_DIR").unwrap_or_else(|| "./logs".to_string()),
            minimum_age: parse_or(get("MINIMUM_AGE"), "MINIMUM_AGE", 18)?,
            secure_cookies: parse_or(get("SECURE_COOKIES"), "SECURE_COOKIES", true)?,
        })
    }
}

fn parse_or<T: std::str::FromStr>(raw: Option<String>, name: &str, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            key: format!("{PREFIX}{name}"),
            value,
        }),
    }
}
