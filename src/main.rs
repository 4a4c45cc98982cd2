use schedule_buddy::{
    config::{self, database},
    errors::Result,
    poller,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenvy::dotenv().ok();

    // 3. Load the application configuration (defaults if config.toml is absent)
    let app_config = config::settings::load_default_config()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;
    info!("Configuration loaded.");

    // 4. Open the database and create missing tables
    let database_url = database::get_database_url();
    let db = database::create_connection(&database_url)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // 5. Run the reminder poller until Ctrl-C
    poller::run(&db, &app_config).await
}
