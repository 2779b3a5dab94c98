//! HTTP 错误响应
//!
//! `/generate` 和 `/download` 返回纯文本，两个解释接口返回 JSON `{error}`

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

pub const EXTRACTION_FAILED: &str = "Error extracting text from file or empty file";
pub const NO_TEXT_INPUT: &str = "No text input provided";
pub const GENERATION_FAILED: &str = "Error generating MCQs";
pub const FILE_NOT_FOUND: &str = "File not found";
pub const INTERNAL_ERROR: &str = "Internal server error";

#[derive(Debug)]
pub enum ApiError {
    /// 纯文本响应
    Text { status: StatusCode, message: String },
    /// JSON `{"error": ...}` 响应
    Json { status: StatusCode, message: String },
}

impl ApiError {
    pub fn text(status: StatusCode, message: impl Into<String>) -> Self {
        ApiError::Text {
            status,
            message: message.into(),
        }
    }

    pub fn json(status: StatusCode, message: impl Into<String>) -> Self {
        ApiError::Json {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Text { status, message } => (status, message).into_response(),
            ApiError::Json { status, message } => (status, Json(json!({ "error": message }))).into_response(),
        }
    }
}
