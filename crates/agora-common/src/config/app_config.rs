//! Application configuration structs
//!
//! Loaded from environment variables, with `.env` support via dotenvy.

use agora_core::DeletionPolicy;
use serde::Deserialize;
use std::env;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub database: DatabaseConfig,
    /// Caching is disabled when `REDIS_URL` is unset
    pub redis: Option<RedisConfig>,
    pub cache: CacheConfig,
    pub jwt: JwtConfig,
    pub cors: CorsConfig,
    pub discussion: DiscussionConfig,
    pub snowflake: SnowflakeConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default)]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Apply pending migrations at startup
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    #[serde(default = "default_redis_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_ttl_seconds")]
    pub ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_cache_ttl_seconds(),
        }
    }
}

/// Bearer token verification. Tokens are issued by the identity provider.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    /// Lifetime of tokens minted locally (tooling and tests)
    #[serde(default = "default_token_expiry")]
    pub token_expiry: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Discussion behaviour knobs
#[derive(Debug, Clone, Deserialize)]
pub struct DiscussionConfig {
    #[serde(default)]
    pub deletion_policy: DeletionPolicy,
    /// Row cap for the feed, search and profile listings
    #[serde(default = "default_feed_limit")]
    pub feed_limit: i64,
    /// Deepest level (0-based) below which the thread view stops offering replies
    #[serde(default = "default_max_reply_depth")]
    pub max_reply_depth: usize,
}

impl Default for DiscussionConfig {
    fn default() -> Self {
        Self {
            deletion_policy: DeletionPolicy::default(),
            feed_limit: default_feed_limit(),
            max_reply_depth: default_max_reply_depth(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SnowflakeConfig {
    #[serde(default)]
    pub worker_id: u16,
}

// Default value functions
fn default_app_name() -> String {
    "agora".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_run_migrations() -> bool {
    true
}

fn default_redis_max_connections() -> u32 {
    10
}

fn default_cache_ttl_seconds() -> u64 {
    30
}

fn default_token_expiry() -> i64 {
    3600
}

fn default_feed_limit() -> i64 {
    50
}

fn default_max_reply_depth() -> usize {
    4
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a required variable is missing or a value is malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key/value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let parsed = |key: &'static str| lookup(key).filter(|value| !value.trim().is_empty());
        let number = |key: &'static str| -> Result<Option<i64>, ConfigError> {
            parsed(key)
                .map(|raw| {
                    raw.trim()
                        .parse::<i64>()
                        .map_err(|_| ConfigError::InvalidValue(key, raw))
                })
                .transpose()
        };

        let worker_id = number("WORKER_ID")?.unwrap_or(0);
        if !(0..1024).contains(&worker_id) {
            return Err(ConfigError::InvalidValue(
                "WORKER_ID",
                worker_id.to_string(),
            ));
        }

        let feed_limit = number("FEED_LIMIT")?.unwrap_or_else(default_feed_limit);
        if feed_limit <= 0 {
            return Err(ConfigError::InvalidValue("FEED_LIMIT", feed_limit.to_string()));
        }

        Ok(Self {
            app: AppSettings {
                name: parsed("APP_NAME").unwrap_or_else(default_app_name),
                env: parsed("APP_ENV")
                    .and_then(|s| Environment::parse(&s))
                    .unwrap_or_default(),
            },
            api: ServerConfig {
                host: parsed("API_HOST").unwrap_or_else(default_host),
                port: parse_required(&lookup, "API_PORT")?,
            },
            database: DatabaseConfig {
                url: parsed("DATABASE_URL").ok_or(ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", default_max_connections)?,
                min_connections: parse_or(&lookup, "DATABASE_MIN_CONNECTIONS", default_min_connections)?,
                run_migrations: parse_or(&lookup, "DATABASE_RUN_MIGRATIONS", default_run_migrations)?,
            },
            redis: parsed("REDIS_URL")
                .map(|url| -> Result<RedisConfig, ConfigError> {
                    Ok(RedisConfig {
                        url,
                        max_connections: parse_or(
                            &lookup,
                            "REDIS_MAX_CONNECTIONS",
                            default_redis_max_connections,
                        )?,
                    })
                })
                .transpose()?,
            cache: CacheConfig {
                ttl_seconds: parse_or(&lookup, "CACHE_TTL_SECONDS", default_cache_ttl_seconds)?,
            },
            jwt: JwtConfig {
                secret: parsed("JWT_SECRET").ok_or(ConfigError::MissingVar("JWT_SECRET"))?,
                token_expiry: parse_or(&lookup, "JWT_TOKEN_EXPIRY", default_token_expiry)?,
            },
            cors: CorsConfig {
                allowed_origins: parsed("CORS_ALLOWED_ORIGINS")
                    .map(|s| {
                        s.split(',')
                            .map(str::trim)
                            .filter(|origin| !origin.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            discussion: DiscussionConfig {
                deletion_policy: parse_or(&lookup, "DELETION_POLICY", DeletionPolicy::default)?,
                feed_limit,
                max_reply_depth: parse_or(&lookup, "THREAD_MAX_REPLY_DEPTH", default_max_reply_depth)?,
            },
            snowflake: SnowflakeConfig {
                worker_id: worker_id as u16,
            },
        })
    }
}

fn parse_required<F, T>(lookup: &F, key: &'static str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let raw = lookup(key)
        .filter(|value| !value.trim().is_empty())
        .ok_or(ConfigError::MissingVar(key))?;
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue(key, raw))
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: fn() -> T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key).filter(|value| !value.trim().is_empty()) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
        None => Ok(default()),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
