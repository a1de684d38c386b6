//! 统一错误类型
//!
//! 覆盖校验、网关（数据库）、传输（HTTP）、解码与取消等所有失败场景。
//! 所有错误都只作用于触发它的那一次用户操作，不会导致进程退出。

use serde::Serialize;
use thiserror::Error;

/// 结果类型别名
pub type StudyResult<T> = Result<T, StudyError>;

/// Study Clips 统一错误类型
#[derive(Debug, Error, Serialize)]
pub enum StudyError {
    /// 校验错误（请求发出之前在客户端拦截）
    #[error("Validation error: {0}")]
    Validation(String),

    /// 资源未找到
    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },

    /// 尚未解析出用户身份
    #[error("Not authenticated")]
    NotAuthenticated,

    /// 数据库错误
    #[error("Database error: {0}")]
    Database(String),

    /// 连接池错误
    #[error("Connection pool error: {0}")]
    Pool(String),

    /// 序列化/反序列化错误
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// 网络错误（连接失败、读取流失败等）
    #[error("Network error: {0}")]
    Network(String),

    /// HTTP 429
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// HTTP 402
    #[error("Quota exhausted: {0}")]
    QuotaExhausted(String),

    /// 其他非 2xx 响应
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// 流式响应缺少响应体
    #[error("Response has no body")]
    MissingBody,

    /// 请求超时
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// 操作被取消
    #[error("Cancelled")]
    Cancelled,

    /// 配置错误
    #[error("Config error: {0}")]
    Config(String),

    /// 其他错误
    #[error("{0}")]
    Other(String),
}

impl StudyError {
    pub fn validation(message: impl Into<String>) -> Self {
        StudyError::Validation(message.into())
    }

    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        StudyError::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    /// 根据 HTTP 状态码与错误体中的 `error` 字段构造传输错误
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            429 => StudyError::RateLimited(message),
            402 => StudyError::QuotaExhausted(message),
            _ => StudyError::Http { status, message },
        }
    }

    /// 稳定的错误码，便于上层按类型差异化处理
    pub fn code(&self) -> &'static str {
        match self {
            StudyError::Validation(_) => "VALIDATION_ERROR",
            StudyError::NotFound { .. } => "NOT_FOUND",
            StudyError::NotAuthenticated => "NOT_AUTHENTICATED",
            StudyError::Database(_) => "DATABASE_ERROR",
            StudyError::Pool(_) => "POOL_ERROR",
            StudyError::Serialization(_) => "SERIALIZATION_ERROR",
            StudyError::Network(_) => "NETWORK_ERROR",
            StudyError::RateLimited(_) => "RATE_LIMITED",
            StudyError::QuotaExhausted(_) => "QUOTA_EXHAUSTED",
            StudyError::Http { .. } => "HTTP_ERROR",
            StudyError::MissingBody => "MISSING_BODY",
            StudyError::Timeout(_) => "TIMEOUT",
            StudyError::Cancelled => "CANCELLED",
            StudyError::Config(_) => "CONFIG_ERROR",
            StudyError::Other(_) => "OTHER",
        }
    }

    /// 面向用户的提示文案（toast）
    pub fn user_message(&self) -> String {
        match self {
            StudyError::Validation(msg) => msg.clone(),
            StudyError::RateLimited(_) => {
                "Rate limit exceeded. Please try again in a moment.".to_string()
            }
            StudyError::QuotaExhausted(_) => {
                "AI credits exhausted. Please add credits in Settings.".to_string()
            }
            StudyError::Http { message, .. } if !message.trim().is_empty() => message.clone(),
            StudyError::Timeout(_) => "The AI service took too long to respond.".to_string(),
            StudyError::Cancelled => "Request cancelled.".to_string(),
            StudyError::NotAuthenticated => "Please sign in first.".to_string(),
            _ => "AI request failed".to_string(),
        }
    }

    /// 是否属于用户主动取消（不应作为错误提示）
    pub fn is_cancelled(&self) -> bool {
        matches!(self, StudyError::Cancelled)
    }
}

impl From<rusqlite::Error> for StudyError {
    fn from(e: rusqlite::Error) -> Self {
        StudyError::Database(format!("{:#}", e))
    }
}

impl From<r2d2::Error> for StudyError {
    fn from(e: r2d2::Error) -> Self {
        StudyError::Pool(e.to_string())
    }
}

impl From<serde_json::Error> for StudyError {
    fn from(e: serde_json::Error) -> Self {
        StudyError::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for StudyError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            StudyError::Timeout(e.to_string())
        } else if e.is_decode() {
            StudyError::Serialization(e.to_string())
        } else {
            StudyError::Network(e.to_string())
        }
    }
}

impl From<config::ConfigError> for StudyError {
    fn from(e: config::ConfigError) -> Self {
        StudyError::Config(e.to_string())
    }
}

impl From<tokio::task::JoinError> for StudyError {
    fn from(e: tokio::task::JoinError) -> Self {
        if e.is_cancelled() {
            StudyError::Cancelled
        } else {
            StudyError::Other(format!("Background task failed: {}", e))
        }
    }
}

// 上层 UI 桥接：序列化为结构化 JSON，便于按 code 差异化处理
impl From<StudyError> for String {
    fn from(e: StudyError) -> Self {
        serde_json::json!({
            "code": e.code(),
            "message": e.to_string(),
            "userMessage": e.user_message(),
        })
        .to_string()
    }
}
