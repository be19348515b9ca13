//! Application configuration structs
//!
//! Loads configuration from environment variables (and `.env` when present).

use serde::Deserialize;
use std::env;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
    pub snowflake: SnowflakeConfig,
    pub join_codes: JoinCodeConfig,
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
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" => Ok(Self::Development),
            other => Err(ConfigError::InvalidValue("APP_ENV", other.to_string())),
        }
    }
}

/// HTTP server configuration
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

/// Which store backs the repositories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    /// In-process store, selected with `memory://`
    Memory,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

impl DatabaseConfig {
    pub const MEMORY_URL: &'static str = "memory://";

    #[must_use]
    pub fn backend(&self) -> StoreBackend {
        if self.url.starts_with(Self::MEMORY_URL) {
            StoreBackend::Memory
        } else {
            StoreBackend::Postgres
        }
    }

    /// Config for the in-process store
    #[must_use]
    pub fn memory() -> Self {
        Self {
            url: Self::MEMORY_URL.to_string(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
        }
    }
}

/// JWT configuration
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry: i64,
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
    #[serde(default = "default_burst")]
    pub burst: u32,
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Snowflake ID generator configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SnowflakeConfig {
    #[serde(default)]
    pub worker_id: u16,
}

/// Join code generation settings
#[derive(Debug, Clone, Deserialize)]
pub struct JoinCodeConfig {
    /// Collision retries before giving up with a server error
    #[serde(default = "default_code_max_attempts")]
    pub max_attempts: u32,
}

impl Default for JoinCodeConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_code_max_attempts(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "gather-server".to_string()
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

fn default_access_token_expiry() -> i64 {
    3600 // 1 hour
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_burst() -> u32 {
    50
}

fn default_code_max_attempts() -> u32 {
    100
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    ///
    /// # Errors
    /// Returns an error if required variables are missing or malformed
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);

        let worker_id: u16 = vars.parsed_or("WORKER_ID", 0)?;
        if worker_id >= 1024 {
            return Err(ConfigError::InvalidValue("WORKER_ID", worker_id.to_string()));
        }

        let max_attempts: u32 = vars.parsed_or("JOIN_CODE_MAX_ATTEMPTS", default_code_max_attempts())?;
        if max_attempts == 0 {
            return Err(ConfigError::InvalidValue("JOIN_CODE_MAX_ATTEMPTS", "0".to_string()));
        }

        Ok(Self {
            app: AppSettings {
                name: vars.get("APP_NAME").unwrap_or_else(default_app_name),
                env: vars.parsed_or("APP_ENV", Environment::default())?,
            },
            api: ServerConfig {
                host: vars.get("API_HOST").unwrap_or_else(default_host),
                port: vars.required("API_PORT")?,
            },
            database: DatabaseConfig {
                url: vars.get("DATABASE_URL").ok_or(ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: vars.parsed_or("DATABASE_MAX_CONNECTIONS", default_max_connections())?,
                min_connections: vars.parsed_or("DATABASE_MIN_CONNECTIONS", default_min_connections())?,
            },
            jwt: JwtConfig {
                secret: vars.get("JWT_SECRET").ok_or(ConfigError::MissingVar("JWT_SECRET"))?,
                access_token_expiry: vars
                    .parsed_or("JWT_ACCESS_TOKEN_EXPIRY", default_access_token_expiry())?,
            },
            rate_limit: RateLimitConfig {
                requests_per_second: vars
                    .parsed_or("RATE_LIMIT_REQUESTS_PER_SECOND", default_requests_per_second())?,
                burst: vars.parsed_or("RATE_LIMIT_BURST", default_burst())?,
            },
            cors: CorsConfig {
                allowed_origins: vars
                    .get("CORS_ALLOWED_ORIGINS")
                    .map(|s| {
                        s.split(',')
                            .map(str::trim)
                            .filter(|origin| !origin.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            snowflake: SnowflakeConfig { worker_id },
            join_codes: JoinCodeConfig { max_attempts },
        })
    }
}

struct Vars<F>(F);

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    fn parsed_or<T: FromStr>(&self, key: &'static str, default: T) -> Result<T, ConfigError> {
        match self.get(key) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key, raw)),
            None => Ok(default),
        }
    }

    fn required<T: FromStr>(&self, key: &'static str) -> Result<T, ConfigError> {
        let raw = self.get(key).ok_or(ConfigError::MissingVar(key))?;
        raw.trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key, raw))
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    const MINIMAL: &[(&str, &str)] = &[
        ("API_PORT", "8080"),
        ("DATABASE_URL", "memory://"),
        ("JWT_SECRET", "secret"),
    ];

    #[test]
    fn test_environment_parsing() {
        assert_eq!("PRODUCTION".parse::<Environment>().unwrap(), Environment::Production);
        assert!(Environment::Production.is_production());
        assert!(Environment::Development.is_development());
        assert!("qa".parse::<Environment>().is_err());
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = load(MINIMAL).unwrap();
        assert_eq!(config.app.name, "gather-server");
        assert_eq!(config.api.address(), "127.0.0.1:8080");
        assert_eq!(config.database.backend(), StoreBackend::Memory);
        assert_eq!(config.join_codes.max_attempts, 100);
        assert_eq!(config.jwt.access_token_expiry, 3600);
        assert!(config.cors.allowed_origins.is_empty());
    }

    #[test]
    fn test_missing_required_var() {
        let err = load(&[("API_PORT", "8080"), ("JWT_SECRET", "s")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("DATABASE_URL")));
    }

    #[test]
    fn test_malformed_values_are_rejected() {
        let mut pairs = MINIMAL.to_vec();
        pairs.push(("DATABASE_MAX_CONNECTIONS", "lots"));
        assert!(matches!(
            load(&pairs).unwrap_err(),
            ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS", _)
        ));

        let mut pairs = MINIMAL.to_vec();
        pairs.push(("WORKER_ID", "4096"));
        assert!(matches!(load(&pairs).unwrap_err(), ConfigError::InvalidValue("WORKER_ID", _)));

        let mut pairs = MINIMAL.to_vec();
        pairs.push(("JOIN_CODE_MAX_ATTEMPTS", "0"));
        assert!(load(&pairs).is_err());
    }

    #[test]
    fn test_cors_origins_split() {
        let mut pairs = MINIMAL.to_vec();
        pairs.push(("CORS_ALLOWED_ORIGINS", "http://a.test, http://b.test,"));
        let config = load(&pairs).unwrap();
        assert_eq!(config.cors.allowed_origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn test_postgres_backend() {
        let config = DatabaseConfig {
            url: "postgres://localhost/gather".to_string(),
            max_connections: 1,
            min_connections: 1,
        };
        assert_eq!(config.backend(), StoreBackend::Postgres);
        assert_eq!(DatabaseConfig::memory().backend(), StoreBackend::Memory);
    }
}
