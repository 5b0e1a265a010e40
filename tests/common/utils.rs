use std::net::TcpListener;
use std::sync::Arc;
use once_cell::sync::Lazy;

use padel_score_backend::run;
use padel_score_backend::config::settings::get_config;
use padel_score_backend::db::InMemoryMatchRepository;
use padel_score_backend::services::MatchService;
use padel_score_backend::telemetry::{get_subscriber, init_subscriber};

// Ensure that the `tracing` stack is only initialised once using `once_cell`
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(
            subscriber_name,
            default_filter_level,
            std::io::stdout
        );
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(
            subscriber_name,
            default_filter_level,
            std::io::sink
        );
        init_subscriber(subscriber);
    }
});

pub struct TestApp{
    pub address: String,
    pub repository: Arc<InMemoryMatchRepository>,
}

pub async fn spawn_app() -> TestApp {
    // The first time `initialize` is invoked the code in `TRACING` is executed.
    // All other invocations will instead skip execution.
    Lazy::force(&TRACING);

    let listener = TcpListener::bind("127.0.0.1:0")
        .expect("Failed to bind random port");
    // Get port assigned by the OS
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);
    let configuration = get_config().expect("Failed to read configuration.");

    // Every test gets its own store, no database needed
    let repository = Arc::new(InMemoryMatchRepository::new());
    let server = run(
        listener,
        MatchService::new(repository.clone()),
        configuration.application.cors,
    )
        .expect("Failed to bind address");
    let _ = tokio::spawn(server);
    TestApp {
        address,
        repository,
    }
}
