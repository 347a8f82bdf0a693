use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use album::config::AppConfig;
use album::jwt::JwtService;
use album::media::MediaStore;
use album::repositories::UserRepository;
use album::routes;
use album::state::AppState;
use common::database;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    info!("Starting album service");

    let config = AppConfig::from_env();

    // Initialize database connection pool; failure here is fatal
    let db_config = database::DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;
    database::run_migrations(&pool).await?;

    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    let user_repository = UserRepository::new(pool);
    user_repository
        .seed_if_empty(&config.default_username, &config.default_password)
        .await?;

    let jwt_service = JwtService::new(&config.jwt_secret, config.jwt_expires_in_secs);
    let media_store = MediaStore::new(config.uploads_dir.clone());

    let app_state = AppState {
        user_repository,
        jwt_service,
        media_store,
    };

    let app = routes::create_router(app_state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Album service listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
