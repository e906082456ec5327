use anyhow::Context;
use rentcar_api::{app, state::AppState};
use rentcar_core::document::DocumentStore;
use rentcar_store::app_config::Config;
use rentcar_store::{
    DbClient, LocalDocumentStore, MemoryStore, PgBlogRepository, PgBookingRepository, PgCarRepository,
    PgProfileRepository, RedisClient,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rentcar_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting rentcar API on port {}", config.server.port);

    let documents: Arc<dyn DocumentStore> = Arc::new(LocalDocumentStore::new(
        &config.storage.root,
        &config.storage.public_base_url,
        config.storage.max_upload_bytes,
    ));

    let mut app_state = if config.database.url.is_empty() {
        tracing::warn!("database.url is empty, using the in-memory store");
        AppState::in_memory(
            Arc::new(MemoryStore::new()),
            documents,
            config.auth.clone(),
            config.business_rules.clone(),
            config.storage.clone(),
        )
    } else {
        let db = DbClient::new(&config.database.url, config.database.max_connections)
            .await
            .context("Failed to connect to Postgres")?;
        db.migrate().await.context("Failed to run migrations")?;

        let (events, _) = tokio::sync::broadcast::channel(100);
        AppState {
            cars: Arc::new(PgCarRepository::new(db.pool.clone())),
            bookings: Arc::new(PgBookingRepository::new(db.pool.clone())),
            profiles: Arc::new(PgProfileRepository::new(db.pool.clone())),
            blog: Arc::new(PgBlogRepository::new(db.pool.clone())),
            documents,
            redis: None,
            events,
            auth: config.auth.clone(),
            business_rules: config.business_rules.clone(),
            storage: config.storage.clone(),
        }
    };

    if let Some(redis) = &config.redis {
        let client = RedisClient::new(&redis.url).await.context("Failed to open Redis client")?;
        app_state.redis = Some(Arc::new(client));
        tracing::info!("Rate limiting at {} requests/minute", config.business_rules.rate_limit_per_minute);
    }

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}
