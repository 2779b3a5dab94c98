use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 文本提取错误
    #[error("文本提取错误: {0}")]
    Extract(#[from] ExtractError),
    /// LLM 服务错误
    #[error("LLM错误: {0}")]
    Llm(#[from] LlmError),
    /// 结果文件写入错误
    #[error("结果文件错误: {0}")]
    Artifact(#[from] ArtifactError),
    /// 结果存储错误
    #[error("存储错误: {0}")]
    Store(#[from] StoreError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 其他 IO 错误
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),
}

/// 文本提取错误
#[derive(Debug, Error)]
pub enum ExtractError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// DOCX 解析失败
    #[error("DOCX解析失败 ({path}): {message}")]
    DocxParseFailed { path: String, message: String },
    /// 后台解析任务异常退出
    #[error("解析任务异常退出: {0}")]
    TaskFailed(String),
}

/// LLM 服务错误
#[derive(Debug, Error)]
pub enum LlmError {
    /// 构建请求失败
    #[error("构建LLM请求失败: {0}")]
    RequestBuildFailed(String),
    /// API 调用失败
    #[error("LLM API调用失败 (模型: {model}): {message}")]
    ApiCallFailed { model: String, message: String },
}

/// 结果文件写入错误
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// 写入文本文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// PDF 渲染错误（只记录日志，不向上传播）
#[derive(Debug, Error)]
pub enum RenderError {
    /// 内置字体无法编码的字符
    #[error("内置字体无法编码字符 {ch:?} (第 {line} 行)")]
    UnsupportedCharacter { ch: char, line: usize },
    /// printpdf 内部错误
    #[error("PDF生成失败: {0}")]
    Pdf(String),
    /// 写出 PDF 失败
    #[error("写入PDF失败: {0}")]
    Io(#[from] std::io::Error),
}

/// 结果存储错误
#[derive(Debug, Error)]
pub enum StoreError {
    /// 网络请求失败
    #[error("存储请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// 服务端返回错误响应
    #[error("存储服务返回错误 ({endpoint}): status={status}, body={body}")]
    BadResponse {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// 序列化失败
    #[error("记录序列化失败: {0}")]
    Serialize(#[from] serde_json::Error),
    /// 读取访问令牌文件失败
    #[error("读取访问令牌失败 ({path}): {source}")]
    TokenReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写本地存储文件失败
    #[error("写入存储文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 缺少必要配置
    #[error("缺少必要配置: {name}")]
    MissingValue { name: String },
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    FileReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建LLM API调用错误
    pub fn llm_api_failed(model: impl Into<String>, message: impl std::fmt::Display) -> Self {
        AppError::Llm(LlmError::ApiCallFailed {
            model: model.into(),
            message: message.to_string(),
        })
    }

    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::Extract(ExtractError::ReadFailed {
            path: path.into(),
            source,
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
