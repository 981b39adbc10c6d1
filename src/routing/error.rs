//! 路由模块统一错误处理
//!
//! 提供结构化错误类型。服务边界上的所有失败都以 `RoutingError` 返回，
//! 由调用方（Web 处理器、CLI）转换成 `{"error": ...}` 响应。

use std::fmt;

use thiserror::Error;

use crate::env::EnvError;

/// 路由错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoutingError {
    /// 输入文本为空（去除空白后）
    #[error("Empty text")]
    EmptyInput,

    /// 目标语言不在支持列表中
    #[error("Unsupported target language: {0}")]
    UnsupportedTargetLanguage(String),

    /// 既没有直连模型也无法经枢纽语言中转
    #[error("No model available for {source_lang} → {target_lang}")]
    UnsupportedPair {
        source_lang: String,
        target_lang: String,
    },

    /// 模型加载失败
    #[error("Failed to load model {model} for {pair}: {reason}")]
    ModelLoadFailure {
        model: String,
        pair: String,
        reason: String,
    },

    /// 已加载的引擎翻译失败
    #[error("Translation engine failed: {0}")]
    EngineFailure(String),

    /// 配置错误
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl RoutingError {
    pub fn unsupported_pair(source: &str, target: &str) -> Self {
        RoutingError::UnsupportedPair {
            source_lang: source.to_string(),
            target_lang: target.to_string(),
        }
    }

    /// 检查错误是否可重试
    ///
    /// 加载失败不会写入缓存，因此稍后的请求会重新尝试加载。
    pub fn is_retryable(&self) -> bool {
        match self {
            RoutingError::ModelLoadFailure { .. } => true,
            RoutingError::EngineFailure(_) => true,
            RoutingError::EmptyInput => false,
            RoutingError::UnsupportedTargetLanguage(_) => false,
            RoutingError::UnsupportedPair { .. } => false,
            RoutingError::ConfigError(_) => false,
        }
    }

    /// 获取错误的严重程度
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            RoutingError::EmptyInput => ErrorSeverity::Info,
            RoutingError::UnsupportedTargetLanguage(_) => ErrorSeverity::Info,
            RoutingError::UnsupportedPair { .. } => ErrorSeverity::Warning,
            RoutingError::ModelLoadFailure { .. } => ErrorSeverity::Error,
            RoutingError::EngineFailure(_) => ErrorSeverity::Error,
            RoutingError::ConfigError(_) => ErrorSeverity::Critical,
        }
    }

    /// 是否在进入路由器之前由输入校验产生
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            RoutingError::EmptyInput | RoutingError::UnsupportedTargetLanguage(_)
        )
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

impl From<std::io::Error> for RoutingError {
    fn from(error: std::io::Error) -> Self {
        RoutingError::ConfigError(format!("IO error: {}", error))
    }
}

impl From<serde_json::Error> for RoutingError {
    fn from(error: serde_json::Error) -> Self {
        RoutingError::ConfigError(format!("invalid JSON: {}", error))
    }
}

impl From<toml::de::Error> for RoutingError {
    fn from(error: toml::de::Error) -> Self {
        RoutingError::ConfigError(format!("invalid TOML: {}", error))
    }
}

impl From<EnvError> for RoutingError {
    fn from(error: EnvError) -> Self {
        RoutingError::ConfigError(error.to_string())
    }
}

/// 错误结果类型别名
pub type RoutingResult<T> = Result<T, RoutingError>;

/// 错误处理助手函数
pub mod helpers {
    use super::*;

    /// 记录并返回错误
    pub fn log_error<T>(error: RoutingError) -> RoutingResult<T> {
        match error.severity() {
            ErrorSeverity::Info => tracing::info!("request rejected: {}", error),
            ErrorSeverity::Warning => tracing::warn!("routing failed: {}", error),
            ErrorSeverity::Error => tracing::error!("translation failed: {}", error),
            ErrorSeverity::Critical => tracing::error!("critical routing error: {}", error),
        }

        Err(error)
    }

    /// 创建配置错误
    pub fn config_error<T: fmt::Display>(msg: T) -> RoutingError {
        RoutingError::ConfigError(msg.to_string())
    }

    /// 创建引擎错误
    pub fn engine_error<T: fmt::Display>(msg: T) -> RoutingError {
        RoutingError::EngineFailure(msg.to_string())
    }
}
