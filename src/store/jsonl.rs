//! 本地 JSONL 存储
//!
//! 每行一条 JSON 记录，时间戳由本服务生成

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::error::{AppResult, StoreError};
use crate::store::{ResultRecord, ResultStore};

#[derive(Serialize)]
struct StoredLine<'a> {
    id: String,
    #[serde(flatten)]
    record: &'a ResultRecord,
    timestamp: DateTime<Utc>,
}

pub struct JsonlStore {
    path: PathBuf,
    // 串行化追加，避免并发请求的行交错
    write_lock: Mutex<()>,
}

impl JsonlStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ResultStore for JsonlStore {
    async fn append(&self, record: &ResultRecord) -> AppResult<String> {
        let id = Uuid::new_v4().simple().to_string();
        let line = StoredLine {
            id: id.clone(),
            record,
            timestamp: Utc::now(),
        };
        let mut bytes = serde_json::to_vec(&line).map_err(StoreError::from)?;
        bytes.push(b'\n');

        let write_failed = |e: std::io::Error| StoreError::WriteFailed {
            path: self.path.display().to_string(),
            source: e,
        };

        let _guard = self.write_lock.lock().await;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(write_failed)?;
        file.write_all(&bytes).await.map_err(write_failed)?;
        file.flush().await.map_err(write_failed)?;

        debug!("记录已追加: {} -> {}", id, self.path.display());
        Ok(id)
    }
}
