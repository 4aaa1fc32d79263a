use anyhow::Context;
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use stringside_web::cache::{start_cache_warmer, AppCache};
use stringside_web::checkout::CheckoutConfig;
use stringside_web::{pricing, routes, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("stringside_web=debug,tower_http=info")),
        )
        .init();

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let bind_addr =
        std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let checkout_base_url = std::env::var("CHECKOUT_BASE_URL")
        .context("CHECKOUT_BASE_URL must be set")?;

    let db = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .context("failed to connect to database")?;

    let cache = AppCache::new();
    let state = AppState {
        db: db.clone(),
        cache: cache.clone(),
        checkout: CheckoutConfig {
            base_url: checkout_base_url,
        },
    };

    // Keep policy and catalog warm so the first quote never waits on the db
    tokio::spawn(start_cache_warmer(cache, db));

    let app = Router::new()
        .nest("/api/pricing", pricing::router())
        .nest("/api/orders", routes::orders::router())
        .nest("/api/admin", routes::admin::router())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    info!("Listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
