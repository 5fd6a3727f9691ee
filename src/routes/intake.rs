use crate::commands;
use crate::state::AppState;
use axum::{
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/favicon.ico", get(favicon))
        .route("/register", post(commands::intake::register))
}

// The real intake form is rendered client-side; this service only has to
// answer the route.
async fn index() -> Html<&'static str> {
    Html("<!doctype html><html><body><h1>Захиалгын бүртгэл</h1></body></html>")
}

async fn favicon() -> StatusCode {
    StatusCode::NO_CONTENT
}
