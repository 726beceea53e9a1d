use std::sync::Arc;

use auth::Authenticator;
use sqlx::postgres::PgPoolOptions;
use token_service::cache::connect;
use token_service::cache::RedisRefreshTokenStore;
use token_service::config::Config;
use token_service::domain::session::service::AuthenticationService;
use token_service::inbound::http::router::create_router;
use token_service::repositories::PostgresCredentialStore;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "token_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "token-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        redis_address = %config.redis.address,
        redis_database = config.redis.database,
        access_token_ttl_minutes = config.jwt.access_token_ttl_minutes,
        refresh_token_ttl_hours = config.refresh_token.ttl_hours,
        "Configuration loaded"
    );

    let authenticator = Arc::new(Authenticator::new(config.jwt.secret.as_bytes())?);

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    let redis_connection = connect(&config.redis).await?;

    let credential_store = Arc::new(PostgresCredentialStore::new(pg_pool));
    let refresh_token_store = Arc::new(RedisRefreshTokenStore::new(
        redis_connection,
        config.refresh_token.ttl(),
        config.redis.response_timeout(),
    ));

    let auth_service = Arc::new(AuthenticationService::new(
        credential_store,
        Arc::clone(&authenticator),
        authenticator,
        refresh_token_store,
        config.jwt.access_token_ttl(),
    ));

    let http_address = format!("{}:{}", config.server.host, config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    if let Err(e) = axum::serve(http_listener, create_router(auth_service)).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    tracing::info!("Server exited successfully");

    Ok(())
}
