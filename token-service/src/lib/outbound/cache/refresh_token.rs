use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use redis::Client;
use redis::IntoConnectionInfo;
use redis::RedisResult;

use crate::config::RedisConfig;
use crate::domain::session::models::RefreshRecord;
use crate::domain::session::models::RefreshToken;
use crate::session::errors::RefreshTokenStoreError;
use crate::session::ports::RefreshTokenStore;

const KEY_PREFIX: &str = "refresh_token:";
const CONNECT_ATTEMPTS: u32 = 3;
const CONNECT_RETRY_DELAY_MS: u64 = 100;

/// Open a multiplexed Redis connection, retrying with exponential backoff.
///
/// # Errors
/// * `CacheError` - Address is invalid or every attempt failed
pub async fn connect(config: &RedisConfig) -> Result<MultiplexedConnection, RefreshTokenStoreError> {
    let mut info = format!("redis://{}/{}", config.address, config.database)
        .into_connection_info()
        .map_err(|e| RefreshTokenStoreError::CacheError(format!("Invalid Redis address: {}", e)))?;
    info.redis.password = config.password.clone().filter(|p| !p.is_empty());

    let client = Client::open(info).map_err(|e| RefreshTokenStoreError::CacheError(e.to_string()))?;

    let mut attempts = 0;
    let mut delay = CONNECT_RETRY_DELAY_MS;

    loop {
        attempts += 1;
        tracing::debug!(attempt = attempts, address = %config.address, "Connecting to Redis");

        match client.get_multiplexed_async_connection().await {
            Ok(connection) => {
                tracing::info!(address = %config.address, database = config.database, "Connected to Redis");
                return Ok(connection);
            }
            Err(e) if attempts < CONNECT_ATTEMPTS => {
                tracing::warn!(
                    attempt = attempts,
                    max_attempts = CONNECT_ATTEMPTS,
                    retry_in_ms = delay,
                    error = %e,
                    "Failed to connect to Redis, retrying"
                );
                tokio::time::sleep(Duration::from_millis(delay)).await;
                delay = (delay * 2).min(5000);
            }
            Err(e) => {
                tracing::error!(attempts = attempts, error = %e, "Failed to connect to Redis");
                return Err(RefreshTokenStoreError::CacheError(e.to_string()));
            }
        }
    }
}

/// Refresh token store backed by Redis string keys with an absolute TTL.
#[derive(Clone)]
pub struct RedisRefreshTokenStore {
    connection: MultiplexedConnection,
    ttl: Duration,
    response_timeout: Duration,
}

impl RedisRefreshTokenStore {
    /// # Arguments
    /// * `connection` - Shared multiplexed connection
    /// * `ttl` - Lifetime of every issued token, applied by Redis
    /// * `response_timeout` - Upper bound on each Redis round trip
    pub fn new(connection: MultiplexedConnection, ttl: Duration, response_timeout: Duration) -> Self {
        Self {
            connection,
            ttl,
            response_timeout,
        }
    }

    async fn bounded<T, F>(&self, operation: F) -> Result<T, RefreshTokenStoreError>
    where
        F: Future<Output = RedisResult<T>>,
    {
        tokio::time::timeout(self.response_timeout, operation)
            .await
            .map_err(|_| RefreshTokenStoreError::Timeout(self.response_timeout.as_millis()))?
            .map_err(|e| RefreshTokenStoreError::CacheError(e.to_string()))
    }
}

fn key(token: &RefreshToken) -> String {
    format!("{}{}", KEY_PREFIX, token)
}

#[async_trait]
impl RefreshTokenStore for RedisRefreshTokenStore {
    async fn issue(&self, record: &RefreshRecord) -> Result<RefreshToken, RefreshTokenStoreError> {
        let payload = serde_json::to_string(record)
            .map_err(|e| RefreshTokenStoreError::SerializationFailed(e.to_string()))?;

        let token = RefreshToken::generate();
        let key = key(&token);
        let mut connection = self.connection.clone();

        // SET NX returns nil when the key already exists.
        let stored: Option<String> = self
            .bounded(
                redis::cmd("SET")
                    .arg(&key)
                    .arg(payload)
                    .arg("NX")
                    .arg("EX")
                    .arg(self.ttl.as_secs())
                    .query_async(&mut connection),
            )
            .await?;

        if stored.is_none() {
            tracing::error!(user_id = %record.user_id, "Refresh token collision");
            return Err(RefreshTokenStoreError::Collision);
        }

        tracing::debug!(user_id = %record.user_id, ttl_secs = self.ttl.as_secs(), "Refresh token stored");

        Ok(token)
    }

    async fn resolve(
        &self,
        token: &RefreshToken,
    ) -> Result<Option<RefreshRecord>, RefreshTokenStoreError> {
        let key = key(token);
        let mut connection = self.connection.clone();

        let payload: Option<String> = self
            .bounded(connection.get(&key))
            .await?;

        payload
            .map(|p| {
                serde_json::from_str::<RefreshRecord>(&p)
                    .map_err(|e| RefreshTokenStoreError::SerializationFailed(e.to_string()))
            })
            .transpose()
    }
}
