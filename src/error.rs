//! 统一错误处理
//!
//! 提供结构化错误类型和错误处理机制

use std::fmt;

use thiserror::Error;

/// 翻译错误类型
#[derive(Error, Debug, Clone)]
pub enum TranslationError {
    /// 翻译服务不可用（可用性探测失败）
    #[error("翻译服务不可用，界面将继续使用当前语言")]
    EndpointUnavailable,

    /// 不支持的目标语言
    #[error("不支持的语言: {0}")]
    UnsupportedLanguage(String),

    /// 网络请求错误
    #[error("网络请求失败: {0}")]
    RequestFailed(String),

    /// 翻译API返回非成功状态
    #[error("翻译API错误 (状态码 {status}): {message}")]
    ApiError { status: u16, message: String },

    /// 响应体解析错误
    #[error("响应解析失败: {0}")]
    InvalidResponse(String),

    /// 配置错误
    #[error("配置错误: {0}")]
    ConfigError(String),

    /// 内部错误
    #[error("内部错误: {0}")]
    InternalError(String),
}

impl TranslationError {
    /// 检查错误消息是否面向最终用户
    ///
    /// 面向用户的错误由会话控制器原样上抛，作为界面提示展示；
    /// 其余错误只进入日志。
    pub fn is_user_visible(&self) -> bool {
        matches!(
            self,
            TranslationError::EndpointUnavailable | TranslationError::UnsupportedLanguage(_)
        )
    }

    /// 获取错误的严重程度
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TranslationError::EndpointUnavailable => ErrorSeverity::Warning,
            TranslationError::UnsupportedLanguage(_) => ErrorSeverity::Info,
            TranslationError::RequestFailed(_) => ErrorSeverity::Warning,
            TranslationError::ApiError { .. } => ErrorSeverity::Error,
            TranslationError::InvalidResponse(_) => ErrorSeverity::Error,
            TranslationError::ConfigError(_) => ErrorSeverity::Critical,
            TranslationError::InternalError(_) => ErrorSeverity::Critical,
        }
    }

    /// 获取错误类别
    pub fn category(&self) -> ErrorCategory {
        match self {
            TranslationError::EndpointUnavailable => ErrorCategory::Service,
            TranslationError::UnsupportedLanguage(_) => ErrorCategory::Input,
            TranslationError::RequestFailed(_) => ErrorCategory::Network,
            TranslationError::ApiError { .. } => ErrorCategory::Service,
            TranslationError::InvalidResponse(_) => ErrorCategory::Parsing,
            TranslationError::ConfigError(_) => ErrorCategory::Configuration,
            TranslationError::InternalError(_) => ErrorCategory::Internal,
        }
    }
}

/// 错误严重程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Input,
    Service,
    Parsing,
    Internal,
}

/// 标准错误转换
impl From<reqwest::Error> for TranslationError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            TranslationError::RequestFailed(format!("请求超时: {}", error))
        } else if error.is_connect() {
            TranslationError::RequestFailed(format!("连接失败: {}", error))
        } else {
            TranslationError::RequestFailed(error.to_string())
        }
    }
}

impl From<serde_json::Error> for TranslationError {
    fn from(error: serde_json::Error) -> Self {
        TranslationError::InvalidResponse(format!("JSON解析错误: {}", error))
    }
}

impl From<toml::de::Error> for TranslationError {
    fn from(error: toml::de::Error) -> Self {
        TranslationError::ConfigError(format!("TOML解析错误: {}", error))
    }
}

impl From<std::io::Error> for TranslationError {
    fn from(error: std::io::Error) -> Self {
        TranslationError::ConfigError(format!("IO错误: {}", error))
    }
}

/// 错误结果类型别名
pub type TranslationResult<T> = Result<T, TranslationError>;

/// 错误处理助手函数
pub mod helpers {
    use super::*;

    /// 按严重程度记录并返回错误
    pub fn log_error<T>(error: TranslationError) -> TranslationResult<T> {
        match error.severity() {
            ErrorSeverity::Info => tracing::info!("翻译信息: {}", error),
            ErrorSeverity::Warning => tracing::warn!("翻译警告: {}", error),
            ErrorSeverity::Error => tracing::error!("翻译错误: {}", error),
            ErrorSeverity::Critical => tracing::error!("翻译严重错误: {}", error),
        }

        Err(error)
    }

    /// 创建配置错误
    pub fn config_error<T: fmt::Display>(msg: T) -> TranslationError {
        TranslationError::ConfigError(msg.to_string())
    }

    /// 创建响应解析错误
    pub fn response_error<T: fmt::Display>(msg: T) -> TranslationError {
        TranslationError::InvalidResponse(msg.to_string())
    }

    /// 创建内部错误
    pub fn internal_error<T: fmt::Display>(msg: T) -> TranslationError {
        TranslationError::InternalError(msg.to_string())
    }
}
