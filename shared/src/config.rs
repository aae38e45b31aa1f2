use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

pub struct Config {
    pub http: HttpConfig,
    pub database: DatabaseConfig,
    /// `None` when neither `REDIS_URL` nor `REDIS_HOST` is set; cache features are then disabled.
    pub cache: Option<CacheConfig>,
}

pub struct HttpConfig {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
}

pub struct DatabaseConfig {
    /// Full connection string. Takes precedence over the discrete fields below.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: Option<String>,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

pub struct CacheConfig {
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub connect_timeout: Duration,
    pub reconnect_interval: Duration,
}

impl Config {
    const DEFAULT_HOST: &'static str = "0.0.0.0";
    const DEFAULT_PORT: u16 = 3000;
    const DEFAULT_DB_HOST: &'static str = "localhost";
    const DEFAULT_DB_PORT: u16 = 5432;
    const DEFAULT_DB_NAME: &'static str = "postgres";
    const DEFAULT_DB_USER: &'static str = "postgres";
    const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_DB_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_REDIS_PORT: u16 = 6379;
    const DEFAULT_REDIS_CONNECT_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_REDIS_RECONNECT_INTERVAL_SECS: u64 = 5;

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let http = HttpConfig {
            host: var("APP_HOST").unwrap_or_else(|| Self::DEFAULT_HOST.to_string()),
            port: parse_or(var("APP_PORT"), "APP_PORT", Self::DEFAULT_PORT),
            allowed_origins: var("ALLOWED_ORIGINS")
                .unwrap_or_else(|| "*".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
        };

        let database = DatabaseConfig {
            url: var("DB_URL"),
            host: var("DB_HOST").unwrap_or_else(|| Self::DEFAULT_DB_HOST.to_string()),
            port: parse_or(var("DB_PORT"), "DB_PORT", Self::DEFAULT_DB_PORT),
            name: var("DB_NAME").unwrap_or_else(|| Self::DEFAULT_DB_NAME.to_string()),
            user: var("DB_USER").unwrap_or_else(|| Self::DEFAULT_DB_USER.to_string()),
            password: var("DB_PASSWORD"),
            max_connections: parse_or(
                var("DB_MAX_CONNECTIONS"),
                "DB_MAX_CONNECTIONS",
                Self::DEFAULT_DB_MAX_CONNECTIONS,
            ),
            acquire_timeout: Duration::from_secs(parse_or(
                var("DB_ACQUIRE_TIMEOUT_SECS"),
                "DB_ACQUIRE_TIMEOUT_SECS",
                Self::DEFAULT_DB_ACQUIRE_TIMEOUT_SECS,
            )),
        };

        let redis_url = var("REDIS_URL");
        let redis_host = var("REDIS_HOST");
        let cache = if redis_url.is_some() || redis_host.is_some() {
            Some(CacheConfig {
                url: redis_url,
                host: redis_host.unwrap_or_else(|| "localhost".to_string()),
                port: parse_or(var("REDIS_PORT"), "REDIS_PORT", Self::DEFAULT_REDIS_PORT),
                connect_timeout: Duration::from_secs(parse_or(
                    var("REDIS_CONNECT_TIMEOUT_SECS"),
                    "REDIS_CONNECT_TIMEOUT_SECS",
                    Self::DEFAULT_REDIS_CONNECT_TIMEOUT_SECS,
                )),
                reconnect_interval: Duration::from_secs(parse_or(
                    var("REDIS_RECONNECT_INTERVAL_SECS"),
                    "REDIS_RECONNECT_INTERVAL_SECS",
                    Self::DEFAULT_REDIS_RECONNECT_INTERVAL_SECS,
                )),
            })
        } else {
            None
        };

        Self {
            http,
            database,
            cache,
        }
    }

    /// Logs the effective settings without leaking credentials.
    pub fn log_summary(&self) {
        info!(
            host = %self.http.host,
            port = self.http.port,
            "HTTP settings"
        );

        match &self.database.url {
            Some(url) => info!(url = %mask_url(url), "Database configured from DB_URL"),
            None => info!(
                host = %self.database.host,
                port = self.database.port,
                database = %self.database.name,
                user = %self.database.user,
                password = if self.database.password.is_some() { "***" } else { "<unset>" },
                "Database configured from discrete settings"
            ),
        }

        match &self.cache {
            Some(cache) => match &cache.url {
                Some(url) => info!(url = %mask_url(url), "Redis configured from REDIS_URL"),
                None => info!(host = %cache.host, port = cache.port, "Redis configured"),
            },
            None => warn!("REDIS_HOST not set, Redis disabled"),
        }
    }
}

impl CacheConfig {
    pub fn connection_url(&self) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => format!("redis://{}:{}/", self.host, self.port),
        }
    }
}

fn parse_or<T: FromStr + Copy>(raw: Option<String>, key: &str, default: T) -> T {
    match raw {
        Some(value) => value.trim().parse::<T>().unwrap_or_else(|_| {
            warn!("{} has invalid value '{}', using default", key, value);
            default
        }),
        None => default,
    }
}

/// Shortens a connection string to `first 12 chars...last 20 chars`.
pub fn mask_url(url: &str) -> String {
    let chars: Vec<char> = url.chars().collect();
    if chars.len() <= 32 {
        return "***".to_string();
    }
    let start: String = chars[..12].iter().collect();
    let end: String = chars[chars.len() - 20..].iter().collect();
    format!("{}...{}", start, end)
}
