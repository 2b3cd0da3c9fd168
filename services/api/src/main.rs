use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use api::{AppState, repositories::SightingRepository, routes};
use common::{cache, cookie, database, session};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting API service");

    // Initialize database connection pool
    let db_config = database::DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;

    // Check database connectivity
    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    // Initialize Redis-backed session store
    let redis_config = cache::RedisConfig::from_env()?;
    let redis_pool = cache::RedisPool::new(&redis_config).await?;
    let session_config = session::SessionConfig::from_env();
    let sessions = session::SessionStore::new(redis_pool, session_config);

    let sightings = SightingRepository::new(pool.clone());

    let app_state = AppState {
        db_pool: pool,
        sightings,
        sessions,
        cookie_secure: cookie::secure_from_env(),
    };

    // Start the web server
    let app = routes::create_router(app_state);

    let addr = std::env::var("API_ADDR").unwrap_or_else(|_| "0.0.0.0:3001".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("API service listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
