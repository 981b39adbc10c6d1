//! 翻译服务
//!
//! 对外部调用方（Web 处理器、CLI）暴露的唯一入口。负责：
//!
//! 1. 校验输入：去除空白后的空文本、目标语言不在支持列表
//! 2. 规范化目标语言大小写
//! 3. 检测源语言
//! 4. 交给路由器翻译
//!
//! ```no_run
//! use langroute::routing::TranslationService;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let service = TranslationService::from_default_config()?;
//! let result = service.resolve_and_translate("नमस्ते", "en").await?;
//! println!("{} → {}: {}", result.source_lang, result.target_lang, result.translated_text);
//! # Ok(())
//! # }
//! ```

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use std::time::Instant;

use super::cache::{CacheStatsSnapshot, ModelCache};
use super::config::{ConfigManager, RouterConfig};
use super::detect::LanguageDetector;
use super::engine::{EngineProvider, HttpEngineProvider};
use super::error::{helpers, RoutingError, RoutingResult};
use super::registry::ModelRegistry;
use super::router::TranslationRouter;
use super::types::{ServiceResponse, TranslationResult};

/// 服务统计信息
#[derive(Debug, Default)]
pub struct ServiceStats {
    requests: AtomicU64,
    succeeded: AtomicU64,
    rejected: AtomicU64,
    failed: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct ServiceStatsSnapshot {
    pub requests: u64,
    pub succeeded: u64,
    pub rejected: u64,
    pub failed: u64,
}

impl ServiceStats {
    fn record(&self, result: &RoutingResult<TranslationResult>) {
        match result {
            Ok(_) => self.succeeded.fetch_add(1, Ordering::Relaxed),
            Err(e) if e.is_validation() => self.rejected.fetch_add(1, Ordering::Relaxed),
            Err(_) => self.failed.fetch_add(1, Ordering::Relaxed),
        };
    }

    pub fn snapshot(&self) -> ServiceStatsSnapshot {
        ServiceStatsSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            succeeded: self.succeeded.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

pub struct TranslationService {
    detector: LanguageDetector,
    router: TranslationRouter,
    supported_targets: Vec<String>,
    stats: ServiceStats,
}

impl TranslationService {
    /// 由配置和引擎提供者组装服务
    pub fn new(
        config: &RouterConfig,
        provider: Arc<dyn EngineProvider>,
        detector: LanguageDetector,
    ) -> Self {
        let registry = ModelRegistry::from_entries(&config.models);
        let cache = Arc::new(ModelCache::new(registry, provider));
        let router = TranslationRouter::new(cache, &config.hub_lang);

        Self {
            detector,
            router,
            supported_targets: config
                .supported_targets
                .iter()
                .map(|lang| lang.trim().to_lowercase())
                .collect(),
            stats: ServiceStats::default(),
        }
    }

    /// 使用 HTTP 模型服务器和 whatlang 检测器
    pub fn from_config(config: &RouterConfig) -> RoutingResult<Self> {
        let provider = HttpEngineProvider::new(&config.engine).map_err(helpers::config_error)?;
        Ok(Self::new(config, Arc::new(provider), LanguageDetector::default()))
    }

    /// 从默认配置路径和环境变量加载
    pub fn from_default_config() -> RoutingResult<Self> {
        let manager = ConfigManager::new()?;
        Self::from_config(manager.get_config())
    }

    /// 校验输入、检测源语言并翻译
    pub async fn resolve_and_translate(
        &self,
        text: &str,
        target_lang: &str,
    ) -> RoutingResult<TranslationResult> {
        self.stats.requests.fetch_add(1, Ordering::Relaxed);
        let result = self.run(text, target_lang).await;
        self.stats.record(&result);
        result
    }

    async fn run(&self, text: &str, target_lang: &str) -> RoutingResult<TranslationResult> {
        let (text, target_lang) = self.validate(text, target_lang)?;
        let source_lang = self.detector.detect(text);

        let started = Instant::now();
        let translated_text = match self.router.translate(text, &source_lang, &target_lang).await {
            Ok(translated) => translated,
            Err(e) => return helpers::log_error(e),
        };

        tracing::info!(
            source = %source_lang,
            target = %target_lang,
            chars = text.chars().count(),
            elapsed = ?started.elapsed(),
            "translation finished"
        );

        Ok(TranslationResult {
            source_lang,
            target_lang,
            translated_text,
        })
    }

    /// 与 `resolve_and_translate` 相同，但失败时返回 `{"error": ...}` 形式的响应
    pub async fn respond(&self, text: &str, target_lang: &str) -> ServiceResponse {
        self.resolve_and_translate(text, target_lang).await.into()
    }

    /// 校验输入，返回去除空白的文本和小写目标语言
    pub fn validate<'a>(&self, text: &'a str, target_lang: &str) -> RoutingResult<(&'a str, String)> {
        let text = text.trim();
        if text.is_empty() {
            return helpers::log_error(RoutingError::EmptyInput);
        }

        let target_lang = target_lang.trim().to_lowercase();
        if !self.supports_target(&target_lang) {
            return helpers::log_error(RoutingError::UnsupportedTargetLanguage(target_lang));
        }

        Ok((text, target_lang))
    }

    pub fn supports_target(&self, lang: &str) -> bool {
        self.supported_targets.iter().any(|supported| supported == lang)
    }

    /// 只检测源语言
    pub fn detect(&self, text: &str) -> RoutingResult<String> {
        let text = text.trim();
        if text.is_empty() {
            return Err(RoutingError::EmptyInput);
        }
        Ok(self.detector.detect(text))
    }

    /// 预加载注册表中的全部模型
    pub async fn warm_up(&self) -> Vec<RoutingError> {
        self.router.cache().warm_up().await
    }

    pub fn supported_targets(&self) -> &[String] {
        &self.supported_targets
    }

    pub fn router(&self) -> &TranslationRouter {
        &self.router
    }

    pub fn cache_stats(&self) -> CacheStatsSnapshot {
        self.router.cache().stats()
    }

    pub fn stats(&self) -> ServiceStatsSnapshot {
        self.stats.snapshot()
    }
}
