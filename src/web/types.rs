//! Web 模块的数据类型定义

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::routing::cache::CacheStatsSnapshot;
use crate::routing::service::ServiceStatsSnapshot;
use crate::routing::TranslationService;

/// 应用状态
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<TranslationService>,
}

/// 翻译请求
#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    pub text: String,
    /// "en", "hi", "fr"
    pub target_lang: String,
}

/// 健康检查响应
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub registered_models: usize,
    pub loaded_models: usize,
    pub cache: CacheStatsSnapshot,
    pub requests: ServiceStatsSnapshot,
}

/// 一个可直连的语言对
#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub source: String,
    pub target: String,
    pub model: String,
    pub loaded: bool,
}

/// 语言信息响应
#[derive(Debug, Serialize)]
pub struct LanguagesResponse {
    pub hub_lang: String,
    pub supported_targets: Vec<String>,
    pub models: Vec<ModelInfo>,
}
