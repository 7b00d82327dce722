//! EventBuddy community events service
//!
//! Main application entry point

use tracing::{error, info};

use EventBuddy::{
    config::Settings,
    database::connection::create_pool,
    services::ServiceFactory,
    utils::logging,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging; the guard flushes file output on shutdown
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", EventBuddy::info());

    // Initialize database connection
    info!("Connecting to database...");
    let db_config = EventBuddy::database::connection::DatabaseConfig {
        url: settings.database.url.clone(),
        max_connections: settings.database.max_connections,
        min_connections: settings.database.min_connections,
        acquire_timeout: std::time::Duration::from_secs(30),
        idle_timeout: Some(std::time::Duration::from_secs(600)),
        max_lifetime: Some(std::time::Duration::from_secs(1800)),
    };
    let db_pool = create_pool(&db_config).await?;

    // Run database migrations
    info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&db_pool).await?;

    // Initialize services
    info!("Initializing services...");
    let services = ServiceFactory::new(db_pool.clone(), settings.clone())?;

    let health = services.health_check(&db_pool).await;
    if !health.is_healthy() {
        for issue in health.get_issues() {
            error!(issue = %issue, "Service health issue");
        }
        anyhow::bail!("Service health check failed");
    }

    let upcoming = services.database.events.get_upcoming_events(Some(5)).await?;
    info!(upcoming_events = upcoming.len(), "EventBuddy is ready");

    // The caller surface is plain service methods; the process stays up to
    // own the pool lifecycle until asked to stop.
    tokio::signal::ctrl_c().await?;

    info!("Shutting down...");
    db_pool.close().await;

    info!("EventBuddy has been shut down.");

    Ok(())
}
