use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use kcrm::config::Settings;
use kcrm::routes::{self, AppState};
use kcrm::services::Catalog;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    // Initialize logging; RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if settings.logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }

    info!("Starting KCRM service...");

    // Seed the catalog
    let catalog = match settings.catalog.snapshot_path.as_deref() {
        Some(path) => Catalog::load(path).map_err(|e| {
            error!("Failed to load catalog snapshot {}: {}", path, e);
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?,
        None => {
            info!("No catalog snapshot configured, starting empty");
            Catalog::new()
        }
    };

    let app_state = AppState::new(&settings, catalog);

    info!(
        "Matcher initialized with weights: {:?} (cache: {} entries, TTL: {}s)",
        settings.weights, settings.matching.cache_size, settings.matching.cache_ttl_secs
    );

    // Drop idle senders from the message rate limiter
    let limiter = app_state.limiter.clone();
    let sweep_every = Duration::from_secs(settings.messages.rate_window_secs.max(60));
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(sweep_every);
        loop {
            interval.tick().await;
            limiter.retain_recent();
            tracing::debug!("Rate limiter tracking {} senders", limiter.tracked_senders());
        }
    });

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(routes::handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(routes::handle_query_payload_error))
            .app_data(web::PathConfig::default().error_handler(routes::handle_path_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
