//! 模型缓存
//!
//! 按语言对懒加载并记忆翻译引擎，保证每个进程内每个语言对最多构造一次引擎。
//!
//! ## 并发
//! 每个语言对对应一个槽位。并发的首次请求由槽位的 gate 串行化：第一个调用者
//! 执行加载，其余调用者等待并共享同一结果，失败也一样。加载失败时槽位保持
//! 未初始化，失败之后到达的请求会重试。
//! `DashMap` 的分片锁只在取槽位时持有，绝不跨越 `.await`。
//!
//! 缓存没有淘汰策略，条目的生命周期等于进程生命周期。

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use std::time::Instant;

use dashmap::DashMap;
use tokio::sync::{Mutex, OnceCell};

use super::engine::{EngineProvider, LoadedEngine};
use super::error::RoutingError;
use super::registry::ModelRegistry;
use super::types::LanguagePair;

/// `get_or_create` 的查找结果
#[derive(Clone)]
pub enum EngineLookup {
    /// 引擎已缓存或刚加载完成
    Found(LoadedEngine),
    /// 注册表中没有这个语言对
    NotSupported,
    /// 语言对受支持，但引擎加载失败
    LoadFailed(RoutingError),
}

impl std::fmt::Debug for EngineLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineLookup::Found(engine) => f.debug_tuple("Found").field(&engine.model()).finish(),
            EngineLookup::NotSupported => f.write_str("NotSupported"),
            EngineLookup::LoadFailed(err) => f.debug_tuple("LoadFailed").field(err).finish(),
        }
    }
}

/// 缓存统计信息（原子计数）
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    loads: AtomicU64,
    load_failures: AtomicU64,
    shared_failures: AtomicU64,
    not_supported: AtomicU64,
}

/// 统计快照
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct CacheStatsSnapshot {
    pub hits: u64,
    pub loads: u64,
    pub load_failures: u64,
    /// 共享了并发加载失败结果的请求数
    pub shared_failures: u64,
    pub not_supported: u64,
}

impl CacheStats {
    pub fn snapshot(&self) -> CacheStatsSnapshot {
        CacheStatsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            loads: self.loads.load(Ordering::Relaxed),
            load_failures: self.load_failures.load(Ordering::Relaxed),
            shared_failures: self.shared_failures.load(Ordering::Relaxed),
            not_supported: self.not_supported.load(Ordering::Relaxed),
        }
    }
}

/// 一个语言对的槽位
///
/// `engine` 只在加载成功后写入。`gate` 串行化加载尝试并保存最近一次失败；
/// `attempts` 是已完成的尝试次数，等待者据此判断自己排队期间是否已有尝试结束。
#[derive(Default)]
struct Slot {
    engine: OnceCell<LoadedEngine>,
    attempts: AtomicU64,
    gate: Mutex<Option<RoutingError>>,
}

pub struct ModelCache {
    registry: ModelRegistry,
    provider: Arc<dyn EngineProvider>,
    slots: DashMap<LanguagePair, Arc<Slot>>,
    stats: CacheStats,
}

impl ModelCache {
    pub fn new(registry: ModelRegistry, provider: Arc<dyn EngineProvider>) -> Self {
        Self {
            registry,
            provider,
            slots: DashMap::new(),
            stats: CacheStats::default(),
        }
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// 获取或创建语言对对应的引擎
    ///
    /// 同一时刻每个语言对最多有一次加载在进行。排队等待的调用者共享这次加载的
    /// 结果，包括失败；失败之后才到达的请求会重新加载。
    pub async fn get_or_create(&self, pair: &LanguagePair) -> EngineLookup {
        let Some(model) = self.registry.model_for(pair) else {
            self.stats.not_supported.fetch_add(1, Ordering::Relaxed);
            return EngineLookup::NotSupported;
        };

        let slot = self.slot(pair);
        if let Some(engine) = slot.engine.get() {
            return self.hit(pair, model, engine);
        }

        let observed = slot.attempts.load(Ordering::Acquire);
        let mut last_failure = slot.gate.lock().await;

        if let Some(engine) = slot.engine.get() {
            return self.hit(pair, model, engine);
        }

        if slot.attempts.load(Ordering::Acquire) != observed {
            if let Some(error) = last_failure.as_ref() {
                self.stats.shared_failures.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(%pair, model, "sharing failure of concurrent load");
                return EngineLookup::LoadFailed(error.clone());
            }
        }

        let started = Instant::now();
        tracing::info!(%pair, model, "loading translation model");

        let result = match self.provider.load(pair, model).await {
            Ok(engine) => {
                self.stats.loads.fetch_add(1, Ordering::Relaxed);
                tracing::info!(%pair, model, elapsed = ?started.elapsed(), "model loaded");
                *last_failure = None;
                // 持有 gate 时槽位必然未初始化
                let _ = slot.engine.set(Arc::clone(&engine));
                EngineLookup::Found(engine)
            }
            Err(e) => {
                self.stats.load_failures.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(%pair, model, error = %e, "model load failed");
                let error = RoutingError::ModelLoadFailure {
                    model: model.to_string(),
                    pair: pair.to_string(),
                    reason: e.to_string(),
                };
                *last_failure = Some(error.clone());
                EngineLookup::LoadFailed(error)
            }
        };

        slot.attempts.fetch_add(1, Ordering::Release);
        result
    }

    fn hit(&self, pair: &LanguagePair, model: &str, engine: &LoadedEngine) -> EngineLookup {
        self.stats.hits.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(%pair, model, "model cache hit");
        EngineLookup::Found(Arc::clone(engine))
    }

    fn slot(&self, pair: &LanguagePair) -> Arc<Slot> {
        if let Some(slot) = self.slots.get(pair) {
            return Arc::clone(slot.value());
        }
        self.slots
            .entry(pair.clone())
            .or_default()
            .value()
            .clone()
    }

    /// 语言对的引擎是否已加载
    pub fn contains(&self, pair: &LanguagePair) -> bool {
        self.slots
            .get(pair)
            .map(|slot| slot.engine.initialized())
            .unwrap_or(false)
    }

    /// 已加载的引擎数量
    pub fn len(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.engine.initialized())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStatsSnapshot {
        self.stats.snapshot()
    }

    /// 预加载注册表中的全部模型
    ///
    /// 失败不会中断预加载，返回所有失败项。
    pub async fn warm_up(&self) -> Vec<RoutingError> {
        let pairs: Vec<LanguagePair> = self
            .registry
            .pairs()
            .into_iter()
            .map(|(pair, _)| pair.clone())
            .collect();

        let mut failures = Vec::new();
        for pair in pairs {
            if let EngineLookup::LoadFailed(e) = self.get_or_create(&pair).await {
                failures.push(e);
            }
        }

        tracing::info!(
            loaded = self.len(),
            failed = failures.len(),
            "model warm-up finished"
        );
        failures
    }
}
