//! HTTP 接口层
//!
//! | 路由 | 处理函数 |
//! |------|----------|
//! | `POST /generate_explanation` | [`explain::generate_explanation`] |
//! | `POST /generate` | [`generate::generate_mcqs`] |
//! | `GET /download/{file_type}/{filename}` | [`download::download_file`] |
//! | `POST /chatbot` | [`explain::chatbot`] |

pub mod download;
pub mod error;
pub mod explain;
pub mod form;
pub mod generate;
pub mod state;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use state::AppState;

/// 构建完整路由
pub fn router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/generate_explanation", post(explain::generate_explanation))
        .route("/generate", post(generate::generate_mcqs))
        .route("/download/{file_type}/{filename}", get(download::download_file))
        .route("/chatbot", post(explain::chatbot))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
