use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use common::database::{DatabaseConfig, ensure_schema, health_check, init_pool};

use api::filter::QueryPolicy;
use api::jwt::{JwtConfig, JwtService};
use api::repositories::{UserRepository, message::MessageRepository};
use api::routes;
use api::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting message desk API");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    ensure_schema(&pool).await?;

    // Initialize the token service
    let jwt_config = JwtConfig::from_env()?;
    let jwt_service = JwtService::new(jwt_config);

    let user_repository = UserRepository::new(pool.clone());
    let message_repository = MessageRepository::new(pool.clone());
    let query_policy = QueryPolicy::from_env();

    let app_state = AppState {
        db_pool: pool,
        user_repository,
        message_repository,
        jwt_service,
        query_policy,
    };

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
    info!("Message desk API listening on 0.0.0.0:8000");

    axum::serve(listener, app).await?;

    Ok(())
}
