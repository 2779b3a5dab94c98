//! `POST /generate`
//!
//! 流程：保存上传文件 → 提取文本 → 生成题目 → 写结果文件 → 追加记录

use std::path::{Path, PathBuf};

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::api::error::{ApiError, EXTRACTION_FAILED, GENERATION_FAILED, NO_TEXT_INPUT};
use crate::api::form::{GenerateInput, UploadedFile};
use crate::api::state::AppState;
use crate::error::AppError;
use crate::services::prompts::MCQ_COUNT;
use crate::services::text_extractor;
use crate::store::ResultRecord;
use crate::utils::{allowed_file, secure_filename};

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub mcqs: String,
    pub txt_file: String,
    pub pdf_file: Option<String>,
}

pub async fn generate_mcqs(
    State(state): State<AppState>,
    input: GenerateInput,
) -> Result<Json<GenerateResponse>, ApiError> {
    let allowed = &state.config.allowed_extensions;
    let upload = input.file.filter(|f| allowed_file(&f.filename, allowed));

    let text = match upload {
        Some(file) => extract_upload(&state.config.upload_folder, file).await?,
        None => match input.text {
            Some(text) if !text.trim().is_empty() => text,
            _ => return Err(ApiError::text(StatusCode::BAD_REQUEST, NO_TEXT_INPUT)),
        },
    };

    let mcqs = state
        .mcq_generator
        .generate(&text)
        .await
        .map_err(generation_failed)?;

    let paths = state
        .artifact_writer
        .persist(&mcqs)
        .await
        .map_err(generation_failed)?;

    let txt_file = paths.txt_path.display().to_string();
    let pdf_file = paths.pdf_path.as_ref().map(|p| p.display().to_string());

    let record = ResultRecord {
        mcqs: mcqs.clone(),
        num_questions: MCQ_COUNT,
        txt_file: txt_file.clone(),
        pdf_file: pdf_file.clone(),
    };
    let record_id = state.store.append(&record).await.map_err(generation_failed)?;
    info!("✅ 生成完成，记录 ID: {}", record_id);

    Ok(Json(GenerateResponse {
        mcqs,
        txt_file,
        pdf_file,
    }))
}

/// 保存上传文件并提取文本，失败或为空统一返回 500
async fn extract_upload(upload_folder: &Path, file: UploadedFile) -> Result<String, ApiError> {
    let extraction_failed = || ApiError::text(StatusCode::INTERNAL_SERVER_ERROR, EXTRACTION_FAILED);

    let path = save_upload(upload_folder, &file).await.map_err(|e| {
        error!("保存上传文件失败 ({}): {}", file.filename, e);
        extraction_failed()
    })?;
    info!("📥 已保存上传文件: {}", path.display());

    match text_extractor::extract(&path).await {
        Ok(Some(text)) if !text.trim().is_empty() => Ok(text),
        Ok(_) => {
            warn!("上传文件没有可用文本: {}", path.display());
            Err(extraction_failed())
        }
        Err(e) => {
            error!("文本提取失败: {}", e);
            Err(extraction_failed())
        }
    }
}

/// 以 `<请求ID>_<安全文件名>` 写入上传目录
async fn save_upload(upload_folder: &Path, file: &UploadedFile) -> std::io::Result<PathBuf> {
    let safe_name = secure_filename(&file.filename);
    if safe_name.is_empty() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "文件名处理后为空",
        ));
    }
    let path = upload_folder.join(format!("{}_{}", Uuid::new_v4().simple(), safe_name));
    tokio::fs::write(&path, &file.bytes).await?;
    Ok(path)
}

fn generation_failed(e: AppError) -> ApiError {
    error!("Error generating MCQs: {}", e);
    ApiError::text(StatusCode::INTERNAL_SERVER_ERROR, GENERATION_FAILED)
}
