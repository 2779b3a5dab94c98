use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{AppResult, ConfigError};

/// 结果存储后端
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// 本地 JSONL 文件（时间戳由本服务生成）
    Jsonl,
    /// Firestore REST（时间戳由服务端生成）
    Firestore,
}

impl std::str::FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jsonl" => Ok(StoreBackend::Jsonl),
            "firestore" => Ok(StoreBackend::Firestore),
            other => Err(ConfigError::EnvVarParseFailed {
                var_name: "STORE_BACKEND".to_string(),
                value: other.to_string(),
                expected_type: "jsonl | firestore".to_string(),
            }),
        }
    }
}

/// 程序配置
///
/// 启动时构建一次，之后通过 `Arc` 只读共享
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP 监听地址
    pub bind_addr: String,
    /// 上传文件存放目录
    pub upload_folder: PathBuf,
    /// 生成结果存放目录
    pub results_folder: PathBuf,
    /// 允许上传的扩展名（小写，不带点）
    pub allowed_extensions: Vec<String>,
    /// 上传请求体大小上限（字节）
    pub max_upload_bytes: usize,
    /// 解释接口的 500 响应是否带上错误详情
    pub expose_error_details: bool,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    // --- 结果存储配置 ---
    pub store_backend: StoreBackend,
    pub jsonl_store_path: PathBuf,
    pub firestore_base_url: String,
    pub firestore_project_id: String,
    pub firestore_database: String,
    pub firestore_collection: String,
    /// 固定的 OAuth 访问令牌，约一小时后过期，只适合短期运行
    pub firestore_access_token: String,
    /// 访问令牌文件，每次写入前重新读取；由外部进程（如
    /// `gcloud auth print-access-token` 定时任务或元数据代理）负责刷新。
    /// 设置后优先于 `firestore_access_token`
    pub firestore_access_token_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:5000".to_string(),
            upload_folder: PathBuf::from("uploads"),
            results_folder: PathBuf::from("results"),
            allowed_extensions: vec!["pdf".to_string(), "txt".to_string(), "docx".to_string()],
            max_upload_bytes: 32 * 1024 * 1024,
            expose_error_details: true,
            llm_api_key: String::new(),
            llm_api_base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            llm_model_name: "gemini-1.5-pro-latest".to_string(),
            store_backend: StoreBackend::Jsonl,
            jsonl_store_path: PathBuf::from("data/mcq_results.jsonl"),
            firestore_base_url: "https://firestore.googleapis.com/v1".to_string(),
            firestore_project_id: String::new(),
            firestore_database: "(default)".to_string(),
            firestore_collection: "mcq_results".to_string(),
            firestore_access_token: String::new(),
            firestore_access_token_file: None,
        }
    }
}

impl Config {
    /// 加载配置：默认值 → TOML 文件（`MCQ_CONFIG`，可选）→ 环境变量
    pub fn load() -> AppResult<Self> {
        let base = match std::env::var("MCQ_CONFIG") {
            Ok(path) => Self::from_toml_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        base.with_env_overrides()
    }

    /// 仅从环境变量加载
    pub fn from_env() -> AppResult<Self> {
        Self::default().with_env_overrides()
    }

    /// 从 TOML 文件加载，缺失字段使用默认值
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileReadFailed {
            path: path.display().to_string(),
            source: e,
        })?;
        let config = Self::from_toml_str(&content).map_err(|e| match e {
            ConfigError::TomlParseFailed { source, .. } => ConfigError::TomlParseFailed {
                path: path.display().to_string(),
                source,
            },
            other => other,
        })?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::TomlParseFailed {
            path: String::new(),
            source: e,
        })
    }

    fn with_env_overrides(self) -> AppResult<Self> {
        let mut config = self;

        if let Some(v) = env_string("BIND_ADDR") {
            config.bind_addr = v;
        }
        if let Some(v) = env_string("UPLOAD_FOLDER") {
            config.upload_folder = PathBuf::from(v);
        }
        if let Some(v) = env_string("RESULTS_FOLDER") {
            config.results_folder = PathBuf::from(v);
        }
        if let Some(v) = env_string("ALLOWED_EXTENSIONS") {
            config.allowed_extensions = v
                .split(',')
                .map(|s| s.trim().trim_start_matches('.').to_ascii_lowercase())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Some(v) = env_parsed("MAX_UPLOAD_BYTES", "usize")? {
            config.max_upload_bytes = v;
        }
        if let Some(v) = env_parsed("EXPOSE_ERROR_DETAILS", "bool")? {
            config.expose_error_details = v;
        }
        // GOOGLE_API_KEY 兼容旧部署的变量名
        if let Some(v) = env_string("LLM_API_KEY").or_else(|| env_string("GOOGLE_API_KEY")) {
            config.llm_api_key = v;
        }
        if let Some(v) = env_string("LLM_API_BASE_URL") {
            config.llm_api_base_url = v;
        }
        if let Some(v) = env_string("LLM_MODEL_NAME") {
            config.llm_model_name = v;
        }
        if let Some(v) = env_string("STORE_BACKEND") {
            config.store_backend = v.parse()?;
        }
        if let Some(v) = env_string("JSONL_STORE_PATH") {
            config.jsonl_store_path = PathBuf::from(v);
        }
        if let Some(v) = env_string("FIRESTORE_BASE_URL") {
            config.firestore_base_url = v;
        }
        if let Some(v) = env_string("FIRESTORE_PROJECT_ID") {
            config.firestore_project_id = v;
        }
        if let Some(v) = env_string("FIRESTORE_DATABASE") {
            config.firestore_database = v;
        }
        if let Some(v) = env_string("FIRESTORE_COLLECTION") {
            config.firestore_collection = v;
        }
        if let Some(v) = env_string("FIRESTORE_ACCESS_TOKEN") {
            config.firestore_access_token = v;
        }
        if let Some(v) = env_string("FIRESTORE_ACCESS_TOKEN_FILE") {
            config.firestore_access_token_file = Some(PathBuf::from(v));
        }

        config.validate()?;
        Ok(config)
    }

    /// 校验互相依赖的配置项
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store_backend == StoreBackend::Firestore {
            if self.firestore_project_id.is_empty() {
                return Err(ConfigError::MissingValue {
                    name: "firestore_project_id".to_string(),
                });
            }
            if self.firestore_access_token.is_empty() && self.firestore_access_token_file.is_none() {
                return Err(ConfigError::MissingValue {
                    name: "firestore_access_token".to_string(),
                });
            }
        }
        if self.allowed_extensions.is_empty() {
            return Err(ConfigError::MissingValue {
                name: "allowed_extensions".to_string(),
            });
        }
        Ok(())
    }
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn env_parsed<T: std::str::FromStr>(name: &str, expected_type: &str) -> Result<Option<T>, ConfigError> {
    match env_string(name) {
        None => Ok(None),
        Some(value) => value.parse().map(Some).map_err(|_| ConfigError::EnvVarParseFailed {
            var_name: name.to_string(),
            value,
            expected_type: expected_type.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.allowed_extensions, vec!["pdf", "txt", "docx"]);
        assert_eq!(config.store_backend, StoreBackend::Jsonl);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_store_file_is_outside_results_folder() {
        let config = Config::default();
        assert!(!config.jsonl_store_path.starts_with(&config.results_folder));
    }

    #[test]
    fn test_toml_partial_override() {
        let config = Config::from_toml_str(
            r#"
            bind_addr = "127.0.0.1:8080"
            results_folder = "out"
            store_backend = "jsonl"
            "#,
        )
        .unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.results_folder, PathBuf::from("out"));
        // 未出现的字段保留默认值
        assert_eq!(config.upload_folder, PathBuf::from("uploads"));
        assert_eq!(config.firestore_collection, "mcq_results");
    }

    #[test]
    fn test_toml_parse_error() {
        let result = Config::from_toml_str("bind_addr = ");
        assert!(matches!(result, Err(ConfigError::TomlParseFailed { .. })));
    }

    #[test]
    fn test_firestore_requires_project_and_token() {
        let config = Config {
            store_backend: StoreBackend::Firestore,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::MissingValue { .. })));

        let config = Config {
            store_backend: StoreBackend::Firestore,
            firestore_project_id: "demo".to_string(),
            firestore_access_token: "token".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_ok());

        let config = Config {
            store_backend: StoreBackend::Firestore,
            firestore_project_id: "demo".to_string(),
            firestore_access_token_file: Some(PathBuf::from("/run/secrets/firestore-token")),
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_store_backend_from_str() {
        assert_eq!("Firestore".parse::<StoreBackend>().unwrap(), StoreBackend::Firestore);
        assert_eq!("jsonl".parse::<StoreBackend>().unwrap(), StoreBackend::Jsonl);
        assert!("redis".parse::<StoreBackend>().is_err());
    }
}
