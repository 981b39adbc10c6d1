//! 路由层的数据类型定义

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::RoutingError;

/// 有序语言对 `(source, target)`
///
/// 既是模型缓存的键，也是路由的基本单位。语言代码统一为小写。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LanguagePair {
    pub source: String,
    pub target: String,
}

impl LanguagePair {
    pub fn new(source: &str, target: &str) -> Self {
        Self {
            source: source.trim().to_lowercase(),
            target: target.trim().to_lowercase(),
        }
    }

    /// 源语言与目标语言相同
    pub fn is_identity(&self) -> bool {
        self.source == self.target
    }

    /// 任一端是否为给定的枢纽语言
    pub fn touches(&self, lang: &str) -> bool {
        self.source == lang || self.target == lang
    }
}

impl fmt::Display for LanguagePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.source, self.target)
    }
}

/// 翻译成功时返回给调用方的结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResult {
    pub source_lang: String,
    pub target_lang: String,
    pub translated_text: String,
}

/// 服务边界上的响应
///
/// 以 untagged 方式序列化：成功时是三个字段的对象，失败时是 `{"error": "..."}`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ServiceResponse {
    Success(TranslationResult),
    Failure { error: String },
}

impl From<Result<TranslationResult, RoutingError>> for ServiceResponse {
    fn from(result: Result<TranslationResult, RoutingError>) -> Self {
        match result {
            Ok(result) => ServiceResponse::Success(result),
            Err(error) => ServiceResponse::Failure {
                error: error.to_string(),
            },
        }
    }
}
