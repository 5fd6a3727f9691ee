use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use dotenvy::dotenv;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod dedup;
mod error;
mod mailer;
mod routes;
mod schema;
mod sheets;
mod state;

#[cfg(test)]
mod business_logic_tests;

use mailer::Mailer;
use sheets::{GoogleSheets, SheetStore};
use state::AppState;

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Atelier Backend...");

    let store: Option<Arc<dyn SheetStore>> = match GoogleSheets::from_env() {
        Some(client) => {
            tracing::info!("Google Sheets store configured");
            Some(Arc::new(client))
        }
        None => {
            tracing::warn!(
                "Google Sheets not available: SHEET_ID / SHEETS_TOKEN not set"
            );
            None
        }
    };

    let mailer = match Mailer::from_env() {
        Some(m) => Some(Arc::new(m)),
        None => {
            tracing::warn!("Email disabled: SENDER_PASSWORD not set");
            None
        }
    };

    let app_state = AppState::new(store, mailer);

    let app = routes::create_router()
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state);

    let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr_str = format!("0.0.0.0:{}", port);
    let addr = addr_str.parse::<SocketAddr>().expect("Invalid address");

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
