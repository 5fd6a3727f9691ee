use crate::state::AppState;
use axum::Router;

pub mod intake;
pub mod orders;

pub fn create_router() -> Router<AppState> {
    Router::new().merge(intake::router()).merge(orders::router())
}
