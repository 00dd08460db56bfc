use std::sync::Arc;

use auth::AuthGate;
use auth::TokenService;
use auth::UserDirectory;
use content_api::config::Config;
use content_api::domain::session::ports::SessionServicePort;
use content_api::domain::session::service::SessionService;
use content_api::inbound::http::router::create_router;
use content_api::outbound::directory::PostgresUserDirectory;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "content_api=debug,auth=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "content-api",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        token_expiry = config.jwt.token_expiry,
        leeway_seconds = config.jwt.leeway_seconds,
        auto_refresh = config.jwt.auto_refresh,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let directory: Arc<dyn UserDirectory> = Arc::new(PostgresUserDirectory::new(pg_pool));
    let tokens = Arc::new(TokenService::new(
        &config.jwt.token_config(),
        Arc::clone(&directory),
    )?);
    let session_service: Arc<dyn SessionServicePort> =
        Arc::new(SessionService::new(directory, Arc::clone(&tokens)));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(
        session_service,
        AuthGate::new(tokens),
        config.jwt.auto_refresh,
    );

    if let Err(e) = axum::serve(http_listener, http_application).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    tracing::info!("Server exited successfully");
    Ok(())
}
