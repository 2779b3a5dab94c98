//! `POST /generate_explanation` 与 `POST /chatbot`

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::api::error::{ApiError, INTERNAL_ERROR};
use crate::api::state::AppState;
use crate::error::AppError;
use crate::services::ExplanationStyle;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ExplanationRequest {
    pub question: Option<String>,
    #[serde(rename = "correctAnswer")]
    pub correct_answer: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExplanationResponse {
    pub explanation: String,
}

/// 请求体缺失或不是合法 JSON 时按"字段缺失"处理
fn payload_or_default(payload: Result<Json<ExplanationRequest>, JsonRejection>) -> ExplanationRequest {
    match payload {
        Ok(Json(req)) => req,
        Err(e) => {
            warn!("解释请求体解析失败: {}", e);
            ExplanationRequest::default()
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

pub async fn generate_explanation(
    State(state): State<AppState>,
    payload: Result<Json<ExplanationRequest>, JsonRejection>,
) -> Result<Json<ExplanationResponse>, ApiError> {
    let req = payload_or_default(payload);

    let (Some(question), Some(correct_answer)) = (non_empty(req.question), non_empty(req.correct_answer)) else {
        return Err(ApiError::json(
            StatusCode::BAD_REQUEST,
            "Missing question or correct answer",
        ));
    };

    let explanation = state
        .explanation_generator
        .generate(ExplanationStyle::Explain, &question, Some(correct_answer.as_str()))
        .await
        .map_err(|e| internal_error(&state, e))?;

    Ok(Json(ExplanationResponse { explanation }))
}

pub async fn chatbot(
    State(state): State<AppState>,
    payload: Result<Json<ExplanationRequest>, JsonRejection>,
) -> Result<Json<ExplanationResponse>, ApiError> {
    let req = payload_or_default(payload);

    let Some(question) = non_empty(req.question) else {
        return Err(ApiError::json(StatusCode::BAD_REQUEST, "Missing question"));
    };

    let explanation = state
        .explanation_generator
        .generate(ExplanationStyle::Chatbot, &question, req.correct_answer.as_deref())
        .await
        .map_err(|e| internal_error(&state, e))?;

    Ok(Json(ExplanationResponse { explanation }))
}

fn internal_error(state: &AppState, e: AppError) -> ApiError {
    error!("❌ 解释生成失败: {}", e);
    let message = if state.config.expose_error_details {
        e.to_string()
    } else {
        INTERNAL_ERROR.to_string()
    };
    ApiError::json(StatusCode::INTERNAL_SERVER_ERROR, message)
}
