use std::env;
use std::time::Duration;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

const MAX_ACCESS_TOKEN_TTL_MINUTES: i64 = 24 * 60;
const MAX_REFRESH_TOKEN_TTL_HOURS: u64 = 365 * 24;

/// Application configuration for token-service.
///
/// Built once at startup and passed down; nothing reads the environment afterwards.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub jwt: JwtConfig,
    pub refresh_token: RefreshTokenConfig,
}

/// HTTP server configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub http_port: u16,
}

/// PostgreSQL credential store configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_seconds: u64,
}

/// Redis refresh token store configuration.
#[derive(Deserialize, Clone)]
pub struct RedisConfig {
    /// `host:port`
    pub address: String,
    pub password: Option<String>,
    pub database: i64,
    pub response_timeout_ms: u64,
}

/// Access token signing configuration.
#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_ttl_minutes: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RefreshTokenConfig {
    pub ttl_hours: u64,
}

impl std::fmt::Debug for RedisConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisConfig")
            .field("address", &self.address)
            .field("password", &self.password.as_ref().map(|_| "[redacted]"))
            .field("database", &self.database)
            .field("response_timeout_ms", &self.response_timeout_ms)
            .finish()
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[redacted]")
            .field("access_token_ttl_minutes", &self.access_token_ttl_minutes)
            .finish()
    }
}

impl RedisConfig {
    pub fn response_timeout(&self) -> Duration {
        Duration::from_millis(self.response_timeout_ms)
    }
}

impl DatabaseConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_seconds)
    }
}

impl JwtConfig {
    pub fn access_token_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.access_token_ttl_minutes)
    }
}

impl RefreshTokenConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_hours.saturating_mul(60 * 60))
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides.
    ///
    /// # Configuration Priority (highest to lowest)
    /// 1. Environment variables (JWT__SECRET, DATABASE__URL, REDIS__ADDRESS, etc.)
    /// 2. Environment-specific config file (config/{RUN_MODE}.toml)
    /// 3. Default config file (config/default.toml)
    /// 4. Built-in defaults for every optional value
    ///
    /// # Errors
    /// * `ConfigError` - A source failed to parse, a value has the wrong type, or a required
    ///   value is missing or empty
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = Self::builder()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: REDIS__ADDRESS=localhost:6379 overrides redis.address
            .add_source(Environment::default().separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        ConfigBuilder::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.http_port", 4356)?
            .set_default("database.max_connections", 5)?
            .set_default("database.acquire_timeout_seconds", 5)?
            .set_default("redis.database", 0)?
            .set_default("redis.response_timeout_ms", 2000)?
            .set_default("jwt.access_token_ttl_minutes", 15)?
            .set_default("refresh_token.ttl_hours", 8)
    }

    /// Reject configurations the service cannot start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.is_empty() {
            return Err(ConfigError::Message("jwt.secret must not be empty".to_string()));
        }
        if !(1..=MAX_ACCESS_TOKEN_TTL_MINUTES).contains(&self.jwt.access_token_ttl_minutes) {
            return Err(ConfigError::Message(format!(
                "jwt.access_token_ttl_minutes must be between 1 and {}",
                MAX_ACCESS_TOKEN_TTL_MINUTES
            )));
        }
        if self.database.url.is_empty() {
            return Err(ConfigError::Message("database.url must not be empty".to_string()));
        }
        if self.redis.address.is_empty() {
            return Err(ConfigError::Message("redis.address must not be empty".to_string()));
        }
        if !(1..=MAX_REFRESH_TOKEN_TTL_HOURS).contains(&self.refresh_token.ttl_hours) {
            return Err(ConfigError::Message(format!(
                "refresh_token.ttl_hours must be between 1 and {}",
                MAX_REFRESH_TOKEN_TTL_HOURS
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn from_toml(toml: &str) -> Result<Config, ConfigError> {
        let config: Config = Config::builder()?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    const REQUIRED: &str = r#"
        [database]
        url = "postgres://localhost/users"

        [redis]
        address = "localhost:6379"

        [jwt]
        secret = "test-secret"
    "#;

    #[test]
    fn test_defaults_apply() {
        let config = from_toml(REQUIRED).expect("Failed to load config");

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.http_port, 4356);
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.database.acquire_timeout(), Duration::from_secs(5));
        assert_eq!(config.redis.database, 0);
        assert_eq!(config.redis.password, None);
        assert_eq!(config.redis.response_timeout(), Duration::from_millis(2000));
        assert_eq!(config.jwt.access_token_ttl(), chrono::Duration::minutes(15));
        assert_eq!(config.refresh_token.ttl(), Duration::from_secs(8 * 60 * 60));
    }

    #[test]
    fn test_overrides_apply() {
        let toml = format!(
            "{}\n{}",
            REQUIRED.replace("[jwt]", "[jwt]\naccess_token_ttl_minutes = 5"),
            "[refresh_token]\nttl_hours = 1"
        );
        let config = from_toml(&toml).expect("Failed to load config");

        assert_eq!(config.jwt.access_token_ttl(), chrono::Duration::minutes(5));
        assert_eq!(config.refresh_token.ttl(), Duration::from_secs(3600));
    }

    #[test]
    fn test_missing_secret_fails() {
        let toml = r#"
            [database]
            url = "postgres://localhost/users"

            [redis]
            address = "localhost:6379"
        "#;
        assert!(from_toml(toml).is_err());
    }

    #[test]
    fn test_empty_secret_fails() {
        let toml = REQUIRED.replace("test-secret", "");
        assert!(from_toml(&toml).is_err());
    }

    #[test]
    fn test_ttl_bounds() {
        let access = |minutes: i64| {
            from_toml(&REQUIRED.replace(
                "[jwt]",
                &format!("[jwt]\naccess_token_ttl_minutes = {}", minutes),
            ))
        };
        let refresh = |hours: u64| {
            from_toml(&format!("{}\n[refresh_token]\nttl_hours = {}", REQUIRED, hours))
        };

        assert!(access(0).is_err());
        assert!(access(24 * 60).is_ok());
        assert!(access(24 * 60 + 1).is_err());
        assert!(access(i64::MAX).is_err());

        assert!(refresh(0).is_err());
        assert!(refresh(365 * 24).is_ok());
        assert!(refresh(365 * 24 + 1).is_err());
        assert!(refresh(u64::MAX / 2).is_err());
    }

    #[test]
    fn test_empty_redis_address_fails() {
        let toml = REQUIRED.replace("localhost:6379", "");
        assert!(from_toml(&toml).is_err());
    }

    #[test]
    fn test_debug_hides_secrets() {
        let toml = REQUIRED.replace(
            "address = \"localhost:6379\"",
            "address = \"localhost:6379\"\npassword = \"redis-pw\"",
        );
        let config = from_toml(&toml).expect("Failed to load config");
        let debug = format!("{:?}", config);

        assert!(!debug.contains("test-secret"));
        assert!(!debug.contains("redis-pw"));
    }
}
