/// 日志工具模块
///
/// 提供日志初始化和格式化输出的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// 初始化 tracing 日志
///
/// 默认级别为 `info`，可通过 `RUST_LOG` 覆盖。重复调用是安全的。
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 MCQ 生成服务启动");
    info!("🌐 监听地址: {}", config.bind_addr);
    info!("📂 上传目录: {}", config.upload_folder.display());
    info!("📂 结果目录: {}", config.results_folder.display());
    info!("🤖 模型: {} ({})", config.llm_model_name, config.llm_api_base_url);
    info!("🗄️ 结果存储: {:?}", config.store_backend);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大字符数
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
