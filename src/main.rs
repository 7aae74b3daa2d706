use std::sync::Arc;

use color_eyre::eyre::Result;
use dotenv::dotenv;
use healtharmy_api::{config::ApiConfig, middleware::auth::SupabaseTokenVerifier, ApiState};
use healtharmy_core::service::VolunteerService;
use healtharmy_db::{create_pool, schema::initialize_database, PgUserRepository, PgVolunteerRepository};
use healtharmy_notify::{build_notifier, config::NotifierConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ApiConfig::from_env()?;
    let notifier_config = NotifierConfig::from_env()?;
    healtharmy_api::init_tracing(&config)?;

    // Create database connection pool
    let db_pool = create_pool(&config.database_url).await?;

    // Initialize database schema
    initialize_database(&db_pool).await?;

    let volunteers = VolunteerService::new(
        Arc::new(PgVolunteerRepository::new(db_pool.clone())),
        build_notifier(&notifier_config)?,
    );
    let state = Arc::new(ApiState {
        volunteers,
        users: Arc::new(PgUserRepository::new(db_pool)),
        verifier: Arc::new(SupabaseTokenVerifier::new(
            &config.supabase_url,
            config.supabase_service_key.clone(),
        )?),
        owner_id: config.owner_id,
    });

    // Start API server
    healtharmy_api::start_server(config, state).await?;

    Ok(())
}
