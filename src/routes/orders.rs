use crate::commands;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", get(commands::orders::get_orders))
        .route("/orders/:row/status", post(commands::orders::update_status))
        .route(
            "/orders/:row/payment",
            post(commands::orders::update_payment),
        )
}
