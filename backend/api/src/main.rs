use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use std::io;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vidtube_api::config::Settings;
use vidtube_api::handlers;
use vidtube_api::state::AppState;

#[actix_web::main]
async fn main() -> io::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("Configuration loading failed: {:#}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting vidtube-api v{}", env!("CARGO_PKG_VERSION"));

    let db = match PgPoolOptions::new()
        .max_connections(settings.database.max_connections)
        .acquire_timeout(Duration::from_secs(settings.database.acquire_timeout))
        .connect(&settings.database.url)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Database pool creation failed: {:#}", e);
            eprintln!("ERROR: Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!("Connected to PostgreSQL");

    if let Err(e) = sqlx::migrate!("./migrations").run(&db).await {
        tracing::error!("Migration failed: {:#}", e);
        return Err(io::Error::new(
            io::ErrorKind::Other,
            format!("migration failed: {e}"),
        ));
    }
    tracing::info!("Migrations applied");

    tokio::fs::create_dir_all(&settings.upload.staging_dir).await?;

    let store_config = settings
        .storage
        .to_store_config(&settings.upload.staging_dir);
    let media = media_store::MediaStore::connect(store_config).await;

    match media.health_check().await {
        Ok(()) => tracing::info!("Object storage bucket reachable"),
        Err(e) => tracing::warn!("Object storage health check failed: {e}; uploads will fail until it recovers"),
    }

    let bind_address = format!("{}:{}", settings.server.host, settings.server.port);
    tracing::info!("Starting HTTP server at {}", bind_address);

    let state = AppState::new(db, media, settings.clone());

    HttpServer::new(move || {
        let mut cors = Cors::default();
        let mut any_origin = false;
        for origin in state.settings.cors.allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                any_origin = true;
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);
        // Credentialed cookies are incompatible with a wildcard origin
        if !any_origin {
            cors = cors.supports_credentials();
        }

        let jwt = state.settings.jwt.clone();

        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(|cfg| handlers::configure(cfg, &jwt))
    })
    .bind(&bind_address)?
    .run()
    .await
}
