// 集成测试公共模块
//
// 提供可控的引擎提供者、固定结果的统计检测器和测试环境构建器

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use langroute::routing::config::RouterConfig;
use langroute::routing::engine::{EngineError, EngineProvider, LoadedEngine, TranslationEngine};
use langroute::routing::{
    LanguageDetector, LanguagePair, ModelCache, ModelRegistry, StatisticalDetector,
    TranslationRouter, TranslationService,
};

/// 引擎遇到这个字符时返回错误
pub const POISON: &str = "💥";

/// 词典引擎：已知短语查表，其余文本加上 `[target]` 前缀
pub struct DictionaryEngine {
    pub instance: usize,
    model: String,
    target: String,
    phrases: HashMap<&'static str, &'static str>,
}

impl DictionaryEngine {
    fn phrases_for(pair: &LanguagePair) -> HashMap<&'static str, &'static str> {
        let table: &[(&str, &str, &str, &str)] = &[
            ("hi", "en", "नमस्ते", "Hello"),
            ("en", "hi", "Hello", "नमस्ते"),
            ("fr", "en", "Bonjour", "Hello"),
            ("en", "fr", "Hello", "Bonjour"),
            ("hi", "en", "धन्यवाद", "Thank you"),
            ("en", "fr", "Thank you", "Merci"),
        ];

        table
            .iter()
            .filter(|(source, target, _, _)| *source == pair.source && *target == pair.target)
            .map(|(_, _, from, to)| (*from, *to))
            .collect()
    }
}

#[async_trait]
impl TranslationEngine for DictionaryEngine {
    fn model(&self) -> &str {
        &self.model
    }

    async fn translate(&self, text: &str) -> Result<String, EngineError> {
        if text.contains(POISON) {
            return Err(EngineError::Other("decoder crashed".to_string()));
        }

        Ok(match self.phrases.get(text) {
            Some(translated) => translated.to_string(),
            None => format!("[{}] {}", self.target, text),
        })
    }
}

/// 可控的引擎提供者
///
/// 记录加载次数，可为指定语言对注入若干次加载失败，可设置加载延迟。
#[derive(Default)]
pub struct FakeProvider {
    loads: AtomicUsize,
    attempts: AtomicUsize,
    failures: Mutex<HashMap<LanguagePair, usize>>,
    delay: Option<Duration>,
}

impl FakeProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_delay(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay: Some(delay),
            ..Self::default()
        })
    }

    /// 让 `pair` 接下来的 `times` 次加载失败
    pub fn fail_next(&self, pair: LanguagePair, times: usize) {
        self.failures.lock().unwrap().insert(pair, times);
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EngineProvider for FakeProvider {
    async fn load(&self, pair: &LanguagePair, model: &str) -> Result<LoadedEngine, EngineError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        {
            let mut failures = self.failures.lock().unwrap();
            if let Some(remaining) = failures.get_mut(pair) {
                if *remaining > 0 {
                    *remaining -= 1;
                    return Err(EngineError::Status {
                        status: 503,
                        body: "model server warming up".to_string(),
                    });
                }
            }
        }

        let instance = self.loads.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(Arc::new(DictionaryEngine {
            instance,
            model: model.to_string(),
            target: pair.target.clone(),
            phrases: DictionaryEngine::phrases_for(pair),
        }))
    }
}

/// 固定结果的统计检测器
pub struct FixedDetector(pub Option<&'static str>);

impl StatisticalDetector for FixedDetector {
    fn identify(&self, _text: &str) -> Option<String> {
        self.0.map(str::to_string)
    }
}

pub fn french_detector() -> LanguageDetector {
    LanguageDetector::new(Arc::new(FixedDetector(Some("fra"))))
}

pub fn english_detector() -> LanguageDetector {
    LanguageDetector::new(Arc::new(FixedDetector(Some("eng"))))
}

/// 测试环境
pub struct TestEnvironment {
    pub provider: Arc<FakeProvider>,
    pub cache: Arc<ModelCache>,
    pub router: TranslationRouter,
}

impl TestEnvironment {
    pub fn new() -> Self {
        Self::with_provider(FakeProvider::new())
    }

    pub fn with_provider(provider: Arc<FakeProvider>) -> Self {
        let config = RouterConfig::default();
        let registry = ModelRegistry::from_entries(&config.models);
        let cache = Arc::new(ModelCache::new(registry, provider.clone()));
        let router = TranslationRouter::new(Arc::clone(&cache), &config.hub_lang);

        Self {
            provider,
            cache,
            router,
        }
    }
}

/// 构建使用假引擎的服务
pub fn service_with(detector: LanguageDetector) -> (TranslationService, Arc<FakeProvider>) {
    let provider = FakeProvider::new();
    let service = TranslationService::new(&RouterConfig::default(), provider.clone(), detector);
    (service, provider)
}
