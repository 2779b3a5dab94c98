//! 文本提取服务 - 业务能力层
//!
//! 按文件后缀分派到 PDF / DOCX / TXT 解析，不做内容类型探测。
//!
//! | 后缀 | 解析失败时 |
//! |------|-----------|
//! | `.pdf` | 记录错误日志，返回 `None` |
//! | `.docx` | 返回 `Err` |
//! | `.txt` | 返回 `Err` |
//! | 其他 | 直接返回 `None` |

use std::path::Path;

use docx_rs::{DocumentChild, ParagraphChild, RunChild};
use tracing::{debug, error, info};

use crate::error::{AppError, AppResult, ExtractError};

/// 支持的文档类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    Txt,
}

impl DocumentKind {
    /// 只看文件名后缀，不区分大小写
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "docx" => Some(DocumentKind::Docx),
            "txt" => Some(DocumentKind::Txt),
            _ => None,
        }
    }
}

/// 提取文件中的纯文本
///
/// # 返回
/// - `Ok(Some(text))`: 提取成功（可能是空串，由调用方判断）
/// - `Ok(None)`: 不支持的后缀，或 PDF 解析失败
/// - `Err`: 读文件失败 / DOCX 解析失败 / TXT 不是合法 UTF-8
pub async fn extract(path: &Path) -> AppResult<Option<String>> {
    let Some(kind) = DocumentKind::from_path(path) else {
        debug!("不支持的文件类型: {}", path.display());
        return Ok(None);
    };

    let path_str = path.display().to_string();
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| AppError::file_read_failed(&path_str, e))?;

    let text = match kind {
        DocumentKind::Pdf => extract_pdf(bytes, &path_str).await,
        DocumentKind::Docx => Some(extract_docx(bytes, &path_str).await?),
        DocumentKind::Txt => Some(decode_txt(bytes, &path_str)?),
    };

    if let Some(text) = &text {
        info!("📄 {:?} 文本提取完成: {} ({} 字符)", kind, path_str, text.chars().count());
    }
    Ok(text)
}

async fn extract_pdf(bytes: Vec<u8>, path: &str) -> Option<String> {
    // pdf-extract 遇到畸形文件可能 panic，放到阻塞线程里由 JoinError 兜住
    let result = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem_by_pages(&bytes)).await;

    match result {
        Ok(Ok(pages)) => Some(join_pdf_pages(pages)),
        Ok(Err(e)) => {
            error!("PDF 文本提取失败 ({}): {}", path, e);
            None
        }
        Err(e) => {
            error!("PDF 解析任务异常退出 ({}): {}", path, e);
            None
        }
    }
}

/// 丢弃没有文字的页，其余按换行拼接
fn join_pdf_pages(pages: Vec<String>) -> String {
    pages
        .into_iter()
        .filter(|page| !page.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

async fn extract_docx(bytes: Vec<u8>, path: &str) -> AppResult<String> {
    let owned_path = path.to_string();
    let text = tokio::task::spawn_blocking(move || docx_text(&bytes, &owned_path))
        .await
        .map_err(|e| ExtractError::TaskFailed(e.to_string()))??;
    Ok(text)
}

/// 每个段落的 run 文本拼起来，段落之间用换行分隔（空段落保留为空行）
///
/// run 内的制表符记为 `\t`，换行符记为 `\n`
fn docx_text(bytes: &[u8], path: &str) -> Result<String, ExtractError> {
    let docx = docx_rs::read_docx(bytes).map_err(|e| ExtractError::DocxParseFailed {
        path: path.to_string(),
        message: e.to_string(),
    })?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(para) => Some(paragraph_text(&para.children)),
            _ => None,
        })
        .collect();

    Ok(paragraphs.join("\n"))
}

fn paragraph_text(children: &[ParagraphChild]) -> String {
    let mut text = String::new();
    for child in children {
        let ParagraphChild::Run(run) = child else {
            continue;
        };
        for rc in &run.children {
            match rc {
                RunChild::Text(t) => text.push_str(&t.text),
                RunChild::Tab(_) => text.push('\t'),
                RunChild::Break(_) => text.push('\n'),
                _ => {}
            }
        }
    }
    text
}

fn decode_txt(bytes: Vec<u8>, path: &str) -> AppResult<String> {
    String::from_utf8(bytes).map_err(|e| {
        AppError::file_read_failed(
            path,
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.utf8_error()),
        )
    })
}
