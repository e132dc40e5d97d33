//! # Planboard API Server
//!
//! HTTP API for collaborative strategic planning: plan CRUD, the four plan
//! sections, progress scoring, executive summaries, invitations, and
//! notifications.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p planboard-api
//! ```

use planboard_api::{
    app::{build_router, AppState},
    config::Config,
};
use planboard_shared::{
    db,
    events::{run_dispatcher, EventSender},
    redis::{RedisClient, RedisConfig},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "planboard_api=debug,planboard_shared=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Planboard API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    db::migrations::ensure_database_exists(&config.database.url).await?;

    let pool = db::create_pool(db::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    db::run_migrations(&pool).await?;

    // The event channel is best effort; an unreachable Redis must never
    // keep the API from serving requests. Without a dispatcher the
    // receiver drops and enqueued events are discarded with a warning.
    let (events, event_rx) = EventSender::new();
    match RedisClient::new(RedisConfig {
        url: config.redis_url.clone(),
    })
    .await
    {
        Ok(redis) => {
            tokio::spawn(run_dispatcher(event_rx, redis));
        }
        Err(e) => {
            tracing::warn!(error = %e, "Redis unavailable, events will not be published");
        }
    }

    let addr = config.bind_addr();
    let state = AppState::new(pool, config, events);
    let app = build_router(state);

    tracing::info!("Server listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
