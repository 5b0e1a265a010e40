use std::net::TcpListener;
use std::sync::Arc;
use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

use padel_score_backend::run;
use padel_score_backend::config::settings::{get_config, StorageBackend};
use padel_score_backend::db::{InMemoryMatchRepository, MatchQueries, MatchRepository};
use padel_score_backend::services::MatchService;
use padel_score_backend::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Panic if we can't read the config
    let config = get_config().expect("Failed to read the config.");

    let subscriber = get_subscriber(
        "padel-score-backend".into(),
        config.application.log_level.clone(),
        std::io::stdout
    );
    init_subscriber(subscriber);

    let repository: Arc<dyn MatchRepository> = match config.application.storage {
        StorageBackend::Postgres => {
            let connection_pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .acquire_timeout(Duration::from_secs(10))
                .connect(
                    config.database.connection_string().expose_secret()
                )
                .await
                .expect("Failed to connect to Postgres");
            sqlx::migrate!("./migrations")
                .run(&connection_pool)
                .await
                .expect("Failed to migrate the database");
            tracing::info!("Using Postgres match storage");
            Arc::new(MatchQueries::new(connection_pool))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory match storage, matches are lost on restart");
            Arc::new(InMemoryMatchRepository::new())
        }
    };

    let address = format!("{}:{}", config.application.host, config.application.port);
    let listener = TcpListener::bind(&address)?;
    tracing::info!("Padel score API listening on {}", address);

    run(
        listener,
        MatchService::new(repository),
        config.application.cors.clone(),
    )?.await
}
