//! `/generate` 请求体解析
//!
//! 同时接受 `multipart/form-data`（`file` 和/或 `text` 字段）和
//! `application/x-www-form-urlencoded`（只有 `text` 字段）

use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::Form;
use serde::Deserialize;
use tracing::warn;

use crate::api::error::ApiError;

/// 上传的文件
#[derive(Debug)]
pub struct UploadedFile {
    /// 客户端提供的原始文件名（尚未做安全处理）
    pub filename: String,
    pub bytes: Bytes,
}

/// `/generate` 的输入
#[derive(Debug, Default)]
pub struct GenerateInput {
    pub file: Option<UploadedFile>,
    pub text: Option<String>,
}

#[derive(Deserialize)]
struct TextForm {
    text: Option<String>,
}

impl<S> FromRequest<S> for GenerateInput
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state).await.map_err(|e| {
                warn!("multipart 请求解析失败: {}", e);
                ApiError::text(StatusCode::BAD_REQUEST, e.body_text())
            })?;
            return read_multipart(multipart).await;
        }

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(form) = Form::<TextForm>::from_request(req, state).await.map_err(|e| {
                warn!("表单解析失败: {}", e);
                ApiError::text(StatusCode::BAD_REQUEST, e.body_text())
            })?;
            return Ok(GenerateInput {
                file: None,
                text: form.text,
            });
        }

        Ok(GenerateInput::default())
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<GenerateInput, ApiError> {
    let mut input = GenerateInput::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                warn!("读取 multipart 字段失败: {}", e);
                return Err(ApiError::text(e.status(), e.body_text()));
            }
        };

        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    warn!("读取上传文件失败: {}", e);
                    ApiError::text(e.status(), e.body_text())
                })?;
                // 没有选择文件的表单也会带一个空文件名的 file 字段
                if !filename.is_empty() {
                    input.file = Some(UploadedFile { filename, bytes });
                }
            }
            "text" => {
                let text = field.text().await.map_err(|e| ApiError::text(e.status(), e.body_text()))?;
                input.text = Some(text);
            }
            _ => {}
        }
    }

    Ok(input)
}
