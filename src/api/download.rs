//! `GET /download/{file_type}/{filename}`
//!
//! `file_type` 只作为路径的一部分被接受，不参与查找；文件一律从结果目录读取，
//! 且只提供 `generated_mcqs_*` 结果文件

use axum::extract::{Path, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{debug, error};

use crate::api::error::{ApiError, FILE_NOT_FOUND};
use crate::api::state::AppState;
use crate::services::is_artifact_name;
use crate::utils::secure_filename;

pub async fn download_file(
    State(state): State<AppState>,
    Path((file_type, filename)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    debug!("下载请求: type={} name={}", file_type, filename);
    let not_found = || ApiError::text(StatusCode::NOT_FOUND, FILE_NOT_FOUND);

    // 只接受本身已是安全文件名的请求，杜绝目录穿越
    if filename.is_empty() || secure_filename(&filename) != filename {
        return Err(not_found());
    }
    if !is_artifact_name(&filename) {
        debug!("拒绝下载非结果文件: {}", filename);
        return Err(not_found());
    }

    let path = state.config.results_folder.join(&filename);
    match tokio::fs::metadata(&path).await {
        Ok(meta) if meta.is_file() => {}
        _ => return Err(not_found()),
    }

    let bytes = tokio::fs::read(&path).await.map_err(|e| {
        error!("读取下载文件失败 ({}): {}", path.display(), e);
        not_found()
    })?;

    let content_type = mime_guess::from_path(&path).first_or_octet_stream().to_string();
    let disposition = format!("attachment; filename=\"{filename}\"");

    Ok(([(CONTENT_TYPE, content_type), (CONTENT_DISPOSITION, disposition)], bytes).into_response())
}
