//! Firestore REST 存储
//!
//! 通过 `documents:commit` 写入一条新文档，并用 `REQUEST_TIME` 转换让服务端
//! 填写 `timestamp` 字段。
//!
//! OAuth 访问令牌会过期：长期运行时应配置令牌文件，由外部进程刷新，
//! 每次写入前重新读取。

use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, error};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppResult, StoreError};
use crate::store::{ResultRecord, ResultStore};

pub struct FirestoreStore {
    http: reqwest::Client,
    base_url: String,
    project_id: String,
    database: String,
    collection: String,
    token: TokenSource,
}

/// 访问令牌来源
#[derive(Debug, Clone, PartialEq, Eq)]
enum TokenSource {
    Static(String),
    /// 每次请求前重新读取
    File(PathBuf),
}

impl TokenSource {
    fn from_config(config: &Config) -> Self {
        match &config.firestore_access_token_file {
            Some(path) => TokenSource::File(path.clone()),
            None => TokenSource::Static(config.firestore_access_token.clone()),
        }
    }

    async fn current(&self) -> Result<String, StoreError> {
        match self {
            TokenSource::Static(token) => Ok(token.clone()),
            TokenSource::File(path) => {
                let content = tokio::fs::read_to_string(path)
                    .await
                    .map_err(|e| StoreError::TokenReadFailed {
                        path: path.display().to_string(),
                        source: e,
                    })?;
                Ok(content.trim().to_string())
            }
        }
    }
}

impl FirestoreStore {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.firestore_base_url.trim_end_matches('/').to_string(),
            project_id: config.firestore_project_id.clone(),
            database: config.firestore_database.clone(),
            collection: config.firestore_collection.clone(),
            token: TokenSource::from_config(config),
        }
    }

    fn database_path(&self) -> String {
        format!("projects/{}/databases/{}", self.project_id, self.database)
    }

    fn commit_url(&self) -> String {
        format!("{}/{}/documents:commit", self.base_url, self.database_path())
    }

    /// 构建 commit 请求体
    fn commit_body(&self, doc_id: &str, record: &ResultRecord) -> Value {
        let name = format!(
            "{}/documents/{}/{}",
            self.database_path(),
            self.collection,
            doc_id
        );
        json!({
            "writes": [{
                "update": {
                    "name": name,
                    "fields": encode_fields(record),
                },
                "updateTransforms": [{
                    "fieldPath": "timestamp",
                    "setToServerValue": "REQUEST_TIME",
                }],
                "currentDocument": { "exists": false },
            }]
        })
    }
}

/// 按 Firestore 的 typed value 格式编码记录
fn encode_fields(record: &ResultRecord) -> Value {
    let pdf_file = match &record.pdf_file {
        Some(path) => json!({ "stringValue": path }),
        None => json!({ "nullValue": "NULL_VALUE" }),
    };
    json!({
        "mcqs": { "stringValue": record.mcqs },
        // integerValue 在 JSON 中以字符串表示
        "num_questions": { "integerValue": record.num_questions.to_string() },
        "txt_file": { "stringValue": record.txt_file },
        "pdf_file": pdf_file,
    })
}

#[async_trait]
impl ResultStore for FirestoreStore {
    async fn append(&self, record: &ResultRecord) -> AppResult<String> {
        let doc_id = Uuid::new_v4().simple().to_string();
        let url = self.commit_url();
        let body = self.commit_body(&doc_id, record);
        let token = self.token.current().await?;

        debug!("写入 Firestore: {}/{}", self.collection, doc_id);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await
            .map_err(|e| StoreError::RequestFailed {
                endpoint: url.clone(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Firestore 返回错误: status={}, body={}", status, body);
            return Err(StoreError::BadResponse {
                endpoint: url,
                status: status.as_u16(),
                body,
            }
            .into());
        }

        Ok(doc_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: &str) -> Config {
        Config {
            firestore_base_url: base_url.to_string(),
            firestore_project_id: "quiz-demo".to_string(),
            firestore_access_token: "test-token".to_string(),
            ..Config::default()
        }
    }

    fn record() -> ResultRecord {
        ResultRecord {
            mcqs: "## MCQ 1".to_string(),
            num_questions: 25,
            txt_file: "results/generated_mcqs_x.txt".to_string(),
            pdf_file: None,
        }
    }

    #[test]
    fn test_commit_body_encodes_typed_values() {
        let store = FirestoreStore::new(&test_config("http://localhost"));
        let body = store.commit_body("abc", &record());

        let write = &body["writes"][0];
        assert_eq!(
            write["update"]["name"],
            "projects/quiz-demo/databases/(default)/documents/mcq_results/abc"
        );
        let fields = &write["update"]["fields"];
        assert_eq!(fields["mcqs"]["stringValue"], "## MCQ 1");
        assert_eq!(fields["num_questions"]["integerValue"], "25");
        assert_eq!(fields["pdf_file"]["nullValue"], "NULL_VALUE");
        assert_eq!(write["updateTransforms"][0]["setToServerValue"], "REQUEST_TIME");
    }

    #[tokio::test]
    async fn test_append_posts_commit() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/projects/quiz-demo/databases/(default)/documents:commit"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "writeResults": [{ "updateTime": "2024-01-01T00:00:00Z" }],
                "commitTime": "2024-01-01T00:00:00Z"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let store = FirestoreStore::new(&test_config(&server.uri()));
        let id = store.append(&record()).await.unwrap();
        assert_eq!(id.len(), 32);
    }

    #[tokio::test]
    async fn test_token_file_is_reread_on_each_append() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("authorization", "Bearer first-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(header("authorization", "Bearer refreshed-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::TempDir::new().unwrap();
        let token_file = dir.path().join("token");
        std::fs::write(&token_file, "first-token\n").unwrap();
        let config = Config {
            firestore_access_token_file: Some(token_file.clone()),
            ..test_config(&server.uri())
        };
        let store = FirestoreStore::new(&config);

        store.append(&record()).await.unwrap();
        std::fs::write(&token_file, "refreshed-token\n").unwrap();
        store.append(&record()).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_token_file_is_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = Config {
            firestore_access_token_file: Some(dir.path().join("absent")),
            ..test_config("http://localhost:9")
        };
        let store = FirestoreStore::new(&config);

        let err = store.append(&record()).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Store(StoreError::TokenReadFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_append_surfaces_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("permission denied"))
            .mount(&server)
            .await;

        let store = FirestoreStore::new(&test_config(&server.uri()));
        let err = store.append(&record()).await.unwrap_err();
        assert!(err.to_string().contains("403"));
    }
}
