use actix_web::{web, App, HttpServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod db;
mod model;
mod service;

use db::repository::ClaimRepository;
use model::Config;
use service::{ClaimCategorizer, ClaimPipeline, SentimentClient, Translator};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present (ignore if missing)
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let bind_addr = config.bind_addr();

    tracing::info!("Application starting up");

    // Initialize SQLite database
    tracing::info!(database_file = %config.database_file, "Setting up database");
    let db_pool = db::create_pool(&config.database_file)
        .await
        .expect("Failed to create database pool");

    db::init_schema(&db_pool)
        .await
        .expect("Failed to initialize database schema");

    // Process-wide outbound HTTP client, shared by every component that
    // issues external calls.
    let http_client = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()
        .expect("Failed to build HTTP client");

    let repository = ClaimRepository::new(db_pool.clone());

    let sentiment = SentimentClient::new(
        http_client.clone(),
        config.sentiment_url.clone(),
        config.sentiment_api_key.clone(),
    );

    let categorizer = ClaimCategorizer::new(
        http_client.clone(),
        config.keyword_map.clone(),
        config.ai_categories.clone(),
        config.ollama_model.clone(),
        &config.ollama_host,
    );

    // Translation models load eagerly; a pair that fails to load is logged
    // and left unavailable without blocking startup.
    let translator = Translator::load(
        &http_client,
        &config.translation_url,
        &config.translation_models,
    )
    .await;

    let pipeline = web::Data::new(ClaimPipeline::new(
        translator,
        sentiment,
        categorizer,
        repository.clone(),
        config.claim_language.clone(),
        config.base_language.clone(),
    ));

    let repository_data = web::Data::new(repository);
    let db_pool_data = web::Data::new(db_pool);

    tracing::info!("Starting claims triage server on {}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(pipeline.clone())
            .app_data(repository_data.clone())
            .app_data(db_pool_data.clone())
            .configure(api::claims::configure)
            .configure(api::health::configure)
            .configure(api::openapi::configure)
    })
    .bind(&bind_addr)?
    .run()
    .await
}
