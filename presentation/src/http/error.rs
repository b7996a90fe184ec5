//! Errors returned before a response stream is opened.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use testhub_application::GatewayError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("messages must be a non-empty array")]
    EmptyMessages,

    #[error(transparent)]
    NotReady(#[from] GatewayError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::EmptyMessages => StatusCode::BAD_REQUEST,
            AppError::NotReady(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}
