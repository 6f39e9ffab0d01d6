use std::sync::Arc;

use actix_web::{middleware, web, App, HttpServer};

use ens_relay::config;
use ens_relay::routes;
use ens_relay::salesforce::{RecordSink, SalesforceSink};
use ens_relay::store::EventStore;
use ens_relay::webhook::pipeline::PipelineContext;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize logging
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // Load configuration
    let config = config::Config::from_env().map_err(|e| {
        log::error!("Configuration error: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    log::info!("Starting ENS relay on {}:{}", config.host, config.port);

    if config.signature_key.is_none() {
        log::warn!("ENS_SIGNATURE_KEY not set, callbacks will be accepted unverified");
    }

    // Shared in-memory event store
    let store = Arc::new(EventStore::new(config.max_events));

    // Record sink, enabled only when all Salesforce credentials are present
    let sink: Option<Arc<dyn RecordSink>> = match &config.salesforce {
        Some(sf_config) => {
            log::info!(
                "Salesforce sink enabled for {} (object {})",
                sf_config.instance_url,
                sf_config.event_object
            );
            Some(Arc::new(SalesforceSink::new(sf_config.clone())))
        }
        None => {
            log::warn!("Salesforce credentials not set, running in logging-only mode");
            None
        }
    };

    let pipeline = PipelineContext {
        store: store.clone(),
        sink,
    };

    // Clone values for the closure
    let host = config.host.clone();
    let port = config.port;

    let server = HttpServer::new(move || {
        App::new()
            // Share config, store and pipeline with all handlers
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::from(store.clone()))
            .app_data(web::Data::new(pipeline.clone()))
            // Middleware
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            // Routes
            .configure(routes::health::configure)
            .configure(routes::events::configure)
            .configure(routes::callback::configure)
            .configure(routes::dashboard::configure)
    })
    .bind((host.as_str(), port))?
    .shutdown_timeout(30)
    .run();

    // Spawn graceful shutdown handler
    let server_handle = server.handle();
    tokio::spawn(async move {
        shutdown_signal().await;
        log::info!("Shutdown signal received, stopping server...");
        server_handle.stop(true).await;
    });

    server.await
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                log::error!("Failed to install Ctrl+C handler: {}", e);
                // Wait forever if signal handler fails
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                log::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
