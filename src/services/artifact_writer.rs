//! 结果文件写入服务 - 业务能力层
//!
//! 每次生成写出一对文件：`generated_mcqs_<id>.txt` 和 `generated_mcqs_<id>.pdf`。
//! 文件名带请求 ID，并发请求互不覆盖。

use std::path::PathBuf;

use tracing::{error, info};
use uuid::Uuid;

use crate::error::{AppResult, ArtifactError};
use crate::services::pdf_renderer;

const ARTIFACT_PREFIX: &str = "generated_mcqs";

/// 是否是本服务写出的结果文件名（结果目录里的其他文件不对外提供）
pub fn is_artifact_name(name: &str) -> bool {
    name.strip_prefix(ARTIFACT_PREFIX)
        .is_some_and(|rest| rest.starts_with('_'))
}

/// 写出的文件路径
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub txt_path: PathBuf,
    /// PDF 渲染失败时为 `None`
    pub pdf_path: Option<PathBuf>,
}

pub struct ArtifactWriter {
    results_folder: PathBuf,
}

impl ArtifactWriter {
    pub fn new(results_folder: impl Into<PathBuf>) -> Self {
        Self {
            results_folder: results_folder.into(),
        }
    }

    /// 写出文本文件和 PDF
    ///
    /// 文本写入失败直接返回错误；PDF 失败只记日志
    pub async fn persist(&self, mcqs: &str) -> AppResult<ArtifactPaths> {
        let stem = format!("{}_{}", ARTIFACT_PREFIX, Uuid::new_v4().simple());

        let txt_path = self.results_folder.join(format!("{stem}.txt"));
        tokio::fs::write(&txt_path, mcqs)
            .await
            .map_err(|e| ArtifactError::WriteFailed {
                path: txt_path.display().to_string(),
                source: e,
            })?;
        info!("💾 文本已保存: {}", txt_path.display());

        let pdf_path = self.results_folder.join(format!("{stem}.pdf"));
        let text = mcqs.to_string();
        let target = pdf_path.clone();
        let rendered = tokio::task::spawn_blocking(move || pdf_renderer::render_to_file(&text, &target)).await;

        let pdf_path = match rendered {
            Ok(Ok(())) => {
                info!("💾 PDF 已保存: {}", pdf_path.display());
                Some(pdf_path)
            }
            Ok(Err(e)) => {
                error!("生成 PDF 失败: {}", e);
                None
            }
            Err(e) => {
                error!("PDF 渲染任务异常退出: {}", e);
                None
            }
        };

        Ok(ArtifactPaths { txt_path, pdf_path })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_persist_writes_both_files() {
        let dir = TempDir::new().unwrap();
        let writer = ArtifactWriter::new(dir.path());

        let paths = writer.persist("## MCQ 1\n[Easy] Question: 2 + 2?").await.unwrap();

        assert_eq!(std::fs::read_to_string(&paths.txt_path).unwrap(), "## MCQ 1\n[Easy] Question: 2 + 2?");
        let pdf_path = paths.pdf_path.expect("应生成 PDF");
        assert!(pdf_path.exists());
        assert_eq!(paths.txt_path.file_stem(), pdf_path.file_stem());
    }

    #[tokio::test]
    async fn test_persisted_names_are_artifact_names() {
        let dir = TempDir::new().unwrap();
        let writer = ArtifactWriter::new(dir.path());

        let paths = writer.persist("## MCQ 1").await.unwrap();
        let name = paths.txt_path.file_name().unwrap().to_str().unwrap();

        assert!(is_artifact_name(name));
        assert!(!is_artifact_name("mcq_results.jsonl"));
        assert!(!is_artifact_name("generated_mcqs.txt"));
        assert!(!is_artifact_name("generated_mcqsX.txt"));
    }

    #[tokio::test]
    async fn test_persist_uses_unique_names() {
        let dir = TempDir::new().unwrap();
        let writer = ArtifactWriter::new(dir.path());

        let first = writer.persist("first").await.unwrap();
        let second = writer.persist("second").await.unwrap();

        assert_ne!(first.txt_path, second.txt_path);
        assert_eq!(std::fs::read_to_string(&first.txt_path).unwrap(), "first");
        assert_eq!(std::fs::read_to_string(&second.txt_path).unwrap(), "second");
    }

    #[tokio::test]
    async fn test_persist_keeps_txt_when_pdf_fails() {
        let dir = TempDir::new().unwrap();
        let writer = ArtifactWriter::new(dir.path());

        let paths = writer.persist("题目：光合作用").await.unwrap();

        assert!(paths.txt_path.exists());
        assert!(paths.pdf_path.is_none());
    }

    #[tokio::test]
    async fn test_persist_fails_when_folder_missing() {
        let dir = TempDir::new().unwrap();
        let writer = ArtifactWriter::new(dir.path().join("missing"));

        assert!(writer.persist("text").await.is_err());
    }
}
