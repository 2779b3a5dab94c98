use std::sync::Arc;

use crate::clients::{CompletionClient, LlmClient};
use crate::config::Config;
use crate::services::{ArtifactWriter, ExplanationGenerator, McqGenerator};
use crate::store::{build_store, ResultStore};

/// 请求处理共享的只读状态
///
/// 启动时构建一次，各 handler 通过 `State` 拿到克隆（内部都是 `Arc`）
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub mcq_generator: Arc<McqGenerator>,
    pub explanation_generator: Arc<ExplanationGenerator>,
    pub artifact_writer: Arc<ArtifactWriter>,
    pub store: Arc<dyn ResultStore>,
}

impl AppState {
    /// 注入模型客户端和存储（测试时传入桩实现）
    pub fn new(config: Config, client: Arc<dyn CompletionClient>, store: Arc<dyn ResultStore>) -> Self {
        Self {
            mcq_generator: Arc::new(McqGenerator::new(client.clone())),
            explanation_generator: Arc::new(ExplanationGenerator::new(client)),
            artifact_writer: Arc::new(ArtifactWriter::new(&config.results_folder)),
            store,
            config: Arc::new(config),
        }
    }

    /// 按配置创建生产环境的客户端和存储
    pub fn from_config(config: Config) -> Self {
        let client: Arc<dyn CompletionClient> = Arc::new(LlmClient::new(&config));
        let store = build_store(&config);
        Self::new(config, client, store)
    }
}
