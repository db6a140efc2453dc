use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Course search failed: {0:#}")]
    Upstream(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::BadRequest { .. } => {
                tracing::debug!("rejected request: {self}");
                StatusCode::BAD_REQUEST
            }
            AppError::Upstream { .. } => {
                tracing::error!("request failed: {self}");
                StatusCode::BAD_GATEWAY
            }
        };

        (status, self.to_string()).into_response()
    }
}
