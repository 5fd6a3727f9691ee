use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AtelierError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Sheet store not configured")]
    StoreUnavailable,

    #[error("Sheet store error: {0}")]
    Store(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Mail error: {0}")]
    Mail(String),
}

pub type AtelierResult<T> = Result<T, AtelierError>;

impl IntoResponse for AtelierError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AtelierError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AtelierError::StoreUnavailable => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Google Sheets холболт алга байна".to_string(),
            ),
            AtelierError::Store(ref e) => {
                tracing::error!("Sheet store error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Хүснэгт рүү хандаж чадсангүй".to_string(),
                )
            }
            // Transport failures reaching the sheet are store failures too;
            // the surface only speaks 400 and 500.
            AtelierError::Network(ref e) => {
                tracing::error!("Sheet store network error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Хүснэгт рүү хандаж чадсангүй".to_string(),
                )
            }
            _ => {
                tracing::error!("Unhandled error: {:?}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Тодорхойгүй алдаа гарлаа".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
