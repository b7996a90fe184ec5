//! HTTP surface
//!
//! - `POST /api/chat`: run the assistant, streaming notices and the answer
//! - `GET /health`: liveness probe

mod dto;
mod error;
mod handlers;
mod state;
mod stream;

pub use dto::{ChatRequest, HealthResponse};
pub use error::AppError;
pub use state::AppState;
pub use stream::{StreamWriter, spawn_chat};

use axum::Router;
use axum::routing::{get, post};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/chat", post(handlers::chat))
        .route("/health", get(handlers::health))
        .with_state(state)
}
