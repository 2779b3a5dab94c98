//! 结果存储
//!
//! 每次成功生成题目都追加一条记录，只写不读。
//! 没有幂等键，重复提交会产生重复记录。

pub mod firestore;
pub mod jsonl;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::config::{Config, StoreBackend};
use crate::error::AppResult;

pub use firestore::FirestoreStore;
pub use jsonl::JsonlStore;

/// 一次生成事件的记录（时间戳由存储端补上）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRecord {
    pub mcqs: String,
    pub num_questions: u32,
    pub txt_file: String,
    pub pdf_file: Option<String>,
}

/// 追加写入能力
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// 追加一条记录，返回记录 ID
    async fn append(&self, record: &ResultRecord) -> AppResult<String>;
}

/// 按配置创建存储后端
pub fn build_store(config: &Config) -> Arc<dyn ResultStore> {
    match config.store_backend {
        StoreBackend::Jsonl => Arc::new(JsonlStore::new(&config.jsonl_store_path)),
        StoreBackend::Firestore => Arc::new(FirestoreStore::new(config)),
    }
}
