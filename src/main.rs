use actix_web::{App, HttpServer, web};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod app;
mod db;
mod model;
mod service;

use app::AppState;
use model::Config;

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

    let state = match AppState::new(config).await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialize application");
            return Err(std::io::Error::other(e.to_string()));
        }
    };

    let db_pool = web::Data::from(state.db_pool.clone());
    let test_service = web::Data::from(state.test_service.clone());
    let interview_service = web::Data::from(state.interview_service.clone());
    let response_service = web::Data::from(state.response_service.clone());
    let report_service = web::Data::from(state.report_service.clone());

    tracing::info!("Starting hirefast server on {}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(db_pool.clone())
            .app_data(test_service.clone())
            .app_data(interview_service.clone())
            .app_data(response_service.clone())
            .app_data(report_service.clone())
            .configure(api::health::configure)
            .configure(api::openapi::configure)
            .configure(api::test::configure)
            .configure(api::interview::configure)
            .configure(api::response::configure)
            .configure(api::report::configure)
    })
    .bind(&bind_addr)?
    .run()
    .await
}
