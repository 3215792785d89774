//! Chancery Server — Application entry point.
//!
//! Connects to the record store, brings the schema up to date, and
//! hands off to the UI shell's transport. The shell itself is an
//! external collaborator; this binary owns store bootstrap only.

use chancery_db::{DbConfig, DbManager};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("chancery=info".parse().unwrap()),
        )
        .json()
        .init();

    tracing::info!("Starting Chancery server...");

    let config = DbConfig::from_env();
    let manager = match DbManager::connect(&config).await {
        Ok(manager) => manager,
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to the record store");
            std::process::exit(1);
        }
    };

    if let Err(e) = chancery_db::run_migrations(manager.client()).await {
        tracing::error!(error = %e, "Failed to apply schema migrations");
        std::process::exit(1);
    }

    tracing::info!("Record store ready; Chancery server initialized.");
}
