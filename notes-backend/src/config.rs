use std::env;

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const PORT: &str = "PORT";
    pub const BIND_ADDRESS: &str = "BIND_ADDRESS";
    pub const DATABASE_URL: &str = "DATABASE_URL";
    /// Maximum number of pooled SQLite connections.
    pub const DB_POOL_SIZE: &str = "DB_POOL_SIZE";
    /// Comma-separated list of origins allowed by CORS.
    /// Unset or empty means any origin is allowed.
    pub const CORS_ALLOWED_ORIGINS: &str = "CORS_ALLOWED_ORIGINS";
}

/// Default values
pub mod defaults {
    pub const PORT: u16 = 8080;
    pub const BIND_ADDRESS: &str = "0.0.0.0";
    pub const DATABASE_URL: &str = "./.db/notes.db";
    pub const DB_POOL_SIZE: u32 = 8;
}

/// Sentinel database URL for a throwaway in-memory store
pub const IN_MEMORY_DATABASE: &str = ":memory:";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a valid number, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
    #[error("{var} must be greater than zero")]
    Zero { var: &'static str },
}

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub bind_address: String,
    pub database_url: String,
    pub db_pool_size: u32,
    pub cors_allowed_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: defaults::PORT,
            bind_address: defaults::BIND_ADDRESS.to_string(),
            database_url: defaults::DATABASE_URL.to_string(),
            db_pool_size: defaults::DB_POOL_SIZE,
            cors_allowed_origins: Vec::new(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a config from an arbitrary variable source (the process env in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = parse_number(&lookup, env_vars::PORT, defaults::PORT)?;
        let db_pool_size = parse_number(&lookup, env_vars::DB_POOL_SIZE, defaults::DB_POOL_SIZE)?;
        if db_pool_size == 0 {
            return Err(ConfigError::Zero {
                var: env_vars::DB_POOL_SIZE,
            });
        }

        let cors_allowed_origins = lookup(env_vars::CORS_ALLOWED_ORIGINS)
            .map(|raw| {
                raw.split(',')
                    .map(|origin| origin.trim().trim_end_matches('/').to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            port,
            bind_address: lookup(env_vars::BIND_ADDRESS)
                .unwrap_or_else(|| defaults::BIND_ADDRESS.to_string()),
            database_url: lookup(env_vars::DATABASE_URL)
                .unwrap_or_else(|| defaults::DATABASE_URL.to_string()),
            db_pool_size,
            cors_allowed_origins,
        })
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_url == IN_MEMORY_DATABASE
    }
}

fn parse_number<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { var, value }),
        None => Ok(default),
    }
}
