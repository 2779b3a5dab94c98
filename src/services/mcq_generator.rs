//! MCQ 生成服务 - 业务能力层
//!
//! 只负责"把文本变成题目"这一能力：拼提示词、调用模型、取回原始文本。
//! 模型返回的内容不做结构化解析，原样作为结果。

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::clients::CompletionClient;
use crate::error::AppResult;
use crate::services::prompts::{build_mcq_prompt, MCQ_COUNT};
use crate::utils::truncate_text;

/// 模型没有给出候选时的兜底文本
pub const MCQ_FALLBACK: &str = "AI could not generate MCQs.";

pub struct McqGenerator {
    client: Arc<dyn CompletionClient>,
}

impl McqGenerator {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// 生成固定数量（25 道）的题目
    pub async fn generate(&self, input_text: &str) -> AppResult<String> {
        self.generate_with_count(input_text, MCQ_COUNT).await
    }

    /// 按指定数量生成题目
    ///
    /// 模型调用失败时直接返回错误，由调用方决定如何响应
    pub async fn generate_with_count(&self, input_text: &str, num_questions: u32) -> AppResult<String> {
        let prompt = build_mcq_prompt(input_text, num_questions);
        info!(
            "📝 开始生成 {} 道题目，原文 {} 字符",
            num_questions,
            input_text.chars().count()
        );
        debug!("原文预览: {}", truncate_text(input_text, 80));

        match self.client.complete(&prompt).await? {
            Some(text) => {
                let mcqs = text.trim().to_string();
                info!("✓ 题目生成完成，共 {} 字符", mcqs.chars().count());
                Ok(mcqs)
            }
            None => {
                warn!("⚠️ 模型没有返回候选结果，使用兜底文本");
                Ok(MCQ_FALLBACK.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// 固定返回值的模型桩，同时记录收到的提示词
    struct FixedClient {
        reply: Option<String>,
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl CompletionClient for FixedClient {
        async fn complete(&self, prompt: &str) -> AppResult<Option<String>> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.reply.clone())
        }
    }

    struct FailingClient;

    #[async_trait]
    impl CompletionClient for FailingClient {
        async fn complete(&self, _prompt: &str) -> AppResult<Option<String>> {
            Err(AppError::llm_api_failed("stub", "connection reset"))
        }
    }

    #[tokio::test]
    async fn test_generate_trims_first_candidate() {
        let client = Arc::new(FixedClient {
            reply: Some("\n  ## MCQ 1\n[Easy] Question: ...  \n".to_string()),
            prompts: Mutex::new(Vec::new()),
        });
        let generator = McqGenerator::new(client.clone());

        let mcqs = generator.generate("Cells are the unit of life.").await.unwrap();

        assert_eq!(mcqs, "## MCQ 1\n[Easy] Question: ...");
        let prompts = client.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Please generate 25 MCQs"));
        assert!(prompts[0].contains("'Cells are the unit of life.'"));
    }

    #[tokio::test]
    async fn test_generate_falls_back_without_candidates() {
        let client = Arc::new(FixedClient {
            reply: None,
            prompts: Mutex::new(Vec::new()),
        });
        let generator = McqGenerator::new(client);

        let mcqs = generator.generate("anything").await.unwrap();
        assert_eq!(mcqs, MCQ_FALLBACK);
    }

    #[tokio::test]
    async fn test_generate_propagates_model_error() {
        let generator = McqGenerator::new(Arc::new(FailingClient));
        let result = generator.generate("anything").await;
        assert!(matches!(result, Err(AppError::Llm(_))));
    }
}
