//! LLM API 客户端
//!
//! 封装所有与生成式模型相关的调用逻辑
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 兼容 OpenAI API 的服务（Gemini 的 OpenAI 兼容端点、Azure 等）

use async_openai::{
    config::OpenAIConfig,
    types::chat::{ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs},
    Client,
};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, LlmError};

/// 文本补全能力
///
/// 单轮、同步等待完整结果，不做重试
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// 发送一条提示词
    ///
    /// # 返回
    /// - `Some(text)`: 第一个候选结果的文本
    /// - `None`: 模型没有返回任何候选
    async fn complete(&self, prompt: &str) -> AppResult<Option<String>>;
}

/// 基于 async-openai 的生产实现
pub struct LlmClient {
    client: Client<OpenAIConfig>,
    model_name: String,
}

impl LlmClient {
    /// 创建新的 LLM 客户端
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        Self {
            client: Client::with_config(openai_config),
            model_name: config.llm_model_name.clone(),
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }
}

#[async_trait]
impl CompletionClient for LlmClient {
    async fn complete(&self, prompt: &str) -> AppResult<Option<String>> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("提示词长度: {} 字符", prompt.len());

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|e| LlmError::RequestBuildFailed(e.to_string()))?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(vec![ChatCompletionRequestMessage::User(user_msg)])
            .build()
            .map_err(|e| LlmError::RequestBuildFailed(e.to_string()))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            AppError::llm_api_failed(&self.model_name, e)
        })?;

        debug!("LLM API 调用成功，候选数量: {}", response.choices.len());

        Ok(response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 测试 LLM API 连接性
    ///
    /// 运行方式：
    /// ```bash
    /// LLM_API_KEY=... cargo test test_llm_api_connectivity -- --ignored --nocapture
    /// ```
    #[tokio::test]
    #[ignore]
    async fn test_llm_api_connectivity() {
        let _ = tracing_subscriber::fmt::try_init();

        let config = Config::from_env().expect("加载配置失败");
        let client = LlmClient::new(&config);

        let result = client.complete("用一句话解释什么是光合作用。").await;

        match result {
            Ok(Some(response)) => {
                println!("\n========== LLM 响应 ==========");
                println!("{}", response);
                println!("==============================\n");
                assert!(!response.is_empty());
            }
            Ok(None) => panic!("模型没有返回候选结果"),
            Err(e) => panic!("LLM API 测试失败: {}", e),
        }
    }

    #[test]
    fn test_client_uses_configured_model() {
        let config = Config {
            llm_model_name: "gemini-1.5-flash".to_string(),
            ..Config::default()
        };
        let client = LlmClient::new(&config);
        assert_eq!(client.model_name(), "gemini-1.5-flash");
    }
}
