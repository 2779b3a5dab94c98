//! # MCQ Generator
//!
//! 把文档或原始文本交给生成式模型出选择题的 Web 后端
//!
//! ## 架构设计
//!
//! ### ① 外部客户端层（Clients / Store）
//! - `clients/` - `CompletionClient`，兼容 OpenAI API 的模型调用
//! - `store/` - `ResultStore`，Firestore / 本地 JSONL 追加写入
//!
//! ### ② 业务能力层（Services）
//! - `TextExtractor` - PDF / DOCX / TXT 文本提取
//! - `McqGenerator` - 生成 25 道选择题
//! - `ExplanationGenerator` - 解释答案或直接作答
//! - `ArtifactWriter` - 写出 txt 和 pdf 结果文件
//!
//! ### ③ 接口层（API）
//! - `api/` - 路由、请求解析、错误响应，按请求编排上面的能力
//!
//! ### ④ 应用层（App）
//! - `app` - 目录准备、状态构建、启动与退出
//!
//! ## 模块结构

pub mod api;
pub mod app;
pub mod clients;
pub mod config;
pub mod error;
pub mod services;
pub mod store;
pub mod utils;

// 重新导出常用类型
pub use api::{router, AppState};
pub use app::App;
pub use clients::{CompletionClient, LlmClient};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use store::{ResultRecord, ResultStore};
