//! 解释生成服务 - 业务能力层
//!
//! 给定题目（和可选的正确答案），让模型解释答案或直接作答

use std::sync::Arc;

use tracing::{debug, info};

use crate::clients::CompletionClient;
use crate::error::AppResult;
use crate::services::prompts::{build_chatbot_prompt, build_explanation_prompt};
use crate::utils::truncate_text;

/// 提示词风格，对应两个不同的接口
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplanationStyle {
    /// `/generate_explanation`：必须带正确答案
    Explain,
    /// `/chatbot`：正确答案可选
    Chatbot,
}

impl ExplanationStyle {
    /// 模型没有给出候选时的兜底文本
    pub fn fallback(self) -> &'static str {
        match self {
            ExplanationStyle::Explain => "AI could not generate an explanation.",
            ExplanationStyle::Chatbot => "AI couldn't respond.",
        }
    }

    pub fn build_prompt(self, question: &str, correct_answer: Option<&str>) -> String {
        match (self, correct_answer) {
            (ExplanationStyle::Explain, Some(answer)) => build_explanation_prompt(question, answer),
            _ => build_chatbot_prompt(question, correct_answer),
        }
    }
}

pub struct ExplanationGenerator {
    client: Arc<dyn CompletionClient>,
}

impl ExplanationGenerator {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// 生成解释
    ///
    /// 返回模型原文（不做 trim），没有候选时返回对应风格的兜底文本
    pub async fn generate(
        &self,
        style: ExplanationStyle,
        question: &str,
        correct_answer: Option<&str>,
    ) -> AppResult<String> {
        let prompt = style.build_prompt(question, correct_answer);
        info!("🔹 发送解释请求 ({:?}): {}", style, truncate_text(question, 60));
        debug!("提示词: {}", prompt);

        let explanation = self
            .client
            .complete(&prompt)
            .await?
            .unwrap_or_else(|| style.fallback().to_string());

        info!("✅ 解释生成完成，{} 字符", explanation.chars().count());
        Ok(explanation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct EchoClient;

    #[async_trait]
    impl CompletionClient for EchoClient {
        async fn complete(&self, prompt: &str) -> AppResult<Option<String>> {
            Ok(Some(prompt.to_string()))
        }
    }

    struct SilentClient;

    #[async_trait]
    impl CompletionClient for SilentClient {
        async fn complete(&self, _prompt: &str) -> AppResult<Option<String>> {
            Ok(None)
        }
    }

    #[test]
    fn test_explain_style_falls_back_to_direct_answer_without_answer() {
        let prompt = ExplanationStyle::Explain.build_prompt("What is DNA?", None);
        assert!(prompt.starts_with("Answer the following question"));
    }

    #[tokio::test]
    async fn test_generate_uses_style_prompt() {
        let generator = ExplanationGenerator::new(Arc::new(EchoClient));

        let explain = generator
            .generate(ExplanationStyle::Explain, "What is 2 + 2?", Some("4"))
            .await
            .unwrap();
        assert!(explain.contains("concise yet detailed"));

        let chat = generator
            .generate(ExplanationStyle::Chatbot, "What is 2 + 2?", Some("4"))
            .await
            .unwrap();
        assert!(chat.contains("Provide a clear explanation."));
    }

    #[tokio::test]
    async fn test_generate_fallbacks_differ_per_style() {
        let generator = ExplanationGenerator::new(Arc::new(SilentClient));

        let explain = generator
            .generate(ExplanationStyle::Explain, "q", Some("a"))
            .await
            .unwrap();
        assert_eq!(explain, "AI could not generate an explanation.");

        let chat = generator.generate(ExplanationStyle::Chatbot, "q", None).await.unwrap();
        assert_eq!(chat, "AI couldn't respond.");
    }
}
