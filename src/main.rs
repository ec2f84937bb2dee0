use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use patients_core::{PatientService, ServiceConfig, open_store};

/// Main entry point for the patient records service
///
/// Resolves configuration once, opens the patient store (connecting to MongoDB and ensuring the
/// unique email index), then serves the REST API until interrupted.
///
/// # Environment Variables
/// - `PATIENTS_REST_ADDR`: REST server address (default: "0.0.0.0:5000")
/// - `MONGO_URI`: MongoDB connection string (default: "mongodb://localhost:27017/icare")
/// - `MONGO_DB`: database name (default: "icare")
/// - `PATIENTS_COLLECTION`: collection name (default: "patients")
/// - `PATIENTS_STORE`: `mongo` or `memory` (default: "mongo")
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configuration is invalid,
/// - the store cannot be opened,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("patients_run=info".parse()?)
                .add_directive("patients_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = ServiceConfig::from_values(
        std::env::var("PATIENTS_REST_ADDR").ok(),
        std::env::var("MONGO_URI").ok(),
        std::env::var("MONGO_DB").ok(),
        std::env::var("PATIENTS_COLLECTION").ok(),
        std::env::var("PATIENTS_STORE").ok(),
    )?;

    let store = open_store(&cfg).await?;
    let app = api_rest::router(PatientService::new(store));

    tracing::info!("++ Starting patient records REST API on {}", cfg.rest_addr());

    let listener = tokio::net::TcpListener::bind(cfg.rest_addr()).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("-- patient records REST API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {:?}", e);
    }
}
