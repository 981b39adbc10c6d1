//! 翻译路由器
//!
//! 把 `(text, source, target)` 变成译文：有直连模型时直接翻译，否则经枢纽语言
//! 中转两跳。路线在执行前规划为最多两跳的列表，中转的每一跳只做直连查找，
//! 不会再次规划，因此递归深度有上界。

use std::sync::Arc;

use super::cache::{EngineLookup, ModelCache};
use super::engine::LoadedEngine;
use super::error::{helpers, RoutingError, RoutingResult};
use super::types::LanguagePair;

/// 规划好的一跳
struct Hop {
    pair: LanguagePair,
    engine: Option<LoadedEngine>,
}

pub struct TranslationRouter {
    cache: Arc<ModelCache>,
    hub_lang: String,
}

impl TranslationRouter {
    pub fn new(cache: Arc<ModelCache>, hub_lang: &str) -> Self {
        Self {
            cache,
            hub_lang: hub_lang.trim().to_lowercase(),
        }
    }

    pub fn cache(&self) -> &Arc<ModelCache> {
        &self.cache
    }

    pub fn hub_lang(&self) -> &str {
        &self.hub_lang
    }

    /// 翻译文本
    ///
    /// 源语言与目标语言相同时原样返回。中转任一跳失败时返回最内层的错误，
    /// 不会产生部分译文。
    pub async fn translate(&self, text: &str, source: &str, target: &str) -> RoutingResult<String> {
        let requested = LanguagePair::new(source, target);
        if requested.is_identity() {
            tracing::debug!(pair = %requested, "identity pair, returning input unchanged");
            return Ok(text.to_string());
        }

        let route = self.plan(&requested).await?;
        if route.len() > 1 {
            tracing::info!(
                pair = %requested,
                hub = %self.hub_lang,
                "no direct model, pivoting through hub language"
            );
        }

        let mut current = text.to_string();
        for hop in route {
            let engine = match hop.engine {
                Some(engine) => engine,
                None => self.direct(&hop.pair).await?,
            };

            current = engine.translate(&current).await.map_err(|e| {
                tracing::warn!(pair = %hop.pair, model = engine.model(), error = %e, "engine failed");
                helpers::engine_error(format!("{} ({}): {}", engine.model(), hop.pair, e))
            })?;
        }

        Ok(current)
    }

    /// 规划路线：直连一跳，或经枢纽语言的两跳
    async fn plan(&self, pair: &LanguagePair) -> RoutingResult<Vec<Hop>> {
        match self.cache.get_or_create(pair).await {
            EngineLookup::Found(engine) => Ok(vec![Hop {
                pair: pair.clone(),
                engine: Some(engine),
            }]),
            EngineLookup::LoadFailed(e) => Err(e),
            EngineLookup::NotSupported if !pair.touches(&self.hub_lang) => Ok(vec![
                Hop {
                    pair: LanguagePair::new(&pair.source, &self.hub_lang),
                    engine: None,
                },
                Hop {
                    pair: LanguagePair::new(&self.hub_lang, &pair.target),
                    engine: None,
                },
            ]),
            EngineLookup::NotSupported => {
                Err(RoutingError::unsupported_pair(&pair.source, &pair.target))
            }
        }
    }

    /// 只做直连查找的一跳
    async fn direct(&self, pair: &LanguagePair) -> RoutingResult<LoadedEngine> {
        match self.cache.get_or_create(pair).await {
            EngineLookup::Found(engine) => Ok(engine),
            EngineLookup::LoadFailed(e) => Err(e),
            EngineLookup::NotSupported => {
                Err(RoutingError::unsupported_pair(&pair.source, &pair.target))
            }
        }
    }
}
