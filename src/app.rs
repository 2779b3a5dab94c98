//! 应用生命周期
//!
//! 1. **初始化**：创建上传/结果目录，构建共享状态
//! 2. **运行**：绑定端口并服务请求，Ctrl+C 时优雅退出

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;

use crate::api::{self, AppState};
use crate::config::Config;
use crate::utils::logging::log_startup;

/// 应用主结构
pub struct App {
    bind_addr: String,
    state: AppState,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        for dir in [&config.upload_folder, &config.results_folder] {
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("无法创建目录: {}", dir.display()))?;
        }
        if let Some(parent) = config.jsonl_store_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("无法创建目录: {}", parent.display()))?;
        }

        Ok(Self {
            bind_addr: config.bind_addr.clone(),
            state: AppState::from_config(config),
        })
    }

    /// 运行 HTTP 服务直到收到退出信号
    pub async fn run(self) -> Result<()> {
        let listener = TcpListener::bind(&self.bind_addr)
            .await
            .with_context(|| format!("无法绑定地址: {}", self.bind_addr))?;
        info!("✓ 服务已启动: http://{}", listener.local_addr()?);

        axum::serve(listener, api::router(self.state))
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("HTTP 服务异常退出")?;

        info!("👋 服务已停止");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("监听退出信号失败: {}", e);
    }
}
