use dotenvy::dotenv;
use personnel_transfer::{
    api::{self, AppState},
    config::{
        self,
        database::{create_connection, create_tables, get_database_url},
    },
    core::department::seed_departments,
    errors::Result,
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the application configuration
    let app_config = config::load_default_config()
        .inspect_err(|e| error!("Critical error loading application configuration: {}", e))?;

    // 4. Connect and make sure every table exists
    let database_url = get_database_url(app_config.database.url.as_deref());
    let db = create_connection(&database_url)
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    create_tables(&db)
        .await
        .inspect(|()| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // 5. Seed configured departments (if missing)
    seed_departments(&db, &app_config.departments)
        .await
        .inspect(|created| info!("Seeded {} department(s).", created))
        .inspect_err(|e| error!("Failed to seed departments: {}", e))?;

    // 6. Serve the HTTP API
    let server = app_config.server.clone();
    let state = AppState::new(db, Arc::new(app_config));
    api::serve(&server, state).await
}
