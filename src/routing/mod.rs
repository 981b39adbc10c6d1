//! 语言解析与翻译路由
//!
//! ## 模块组织
//!
//! - `detect` - 源语言检测（字符区间 + 统计检测）
//! - `registry` - 语言对到模型标识的静态映射
//! - `engine` - 引擎提供者接口与 HTTP 模型服务器实现
//! - `cache` - 按语言对懒加载的引擎缓存
//! - `router` - 直连或经枢纽语言中转的路由
//! - `service` - 对外入口：校验、检测、路由
//! - `config` - 配置文件与环境变量
//! - `error` - 统一错误类型

pub mod cache;
pub mod config;
pub mod detect;
pub mod engine;
pub mod error;
pub mod registry;
pub mod router;
pub mod service;
pub mod types;

pub use cache::{CacheStatsSnapshot, EngineLookup, ModelCache};
pub use config::{ConfigManager, EngineConfig, ModelEntry, RouterConfig};
pub use detect::{LanguageDetector, StatisticalDetector, WhatlangDetector};
pub use engine::{EngineError, EngineProvider, HttpEngineProvider, LoadedEngine, TranslationEngine};
pub use error::{RoutingError, RoutingResult};
pub use registry::ModelRegistry;
pub use router::TranslationRouter;
pub use service::TranslationService;
pub use types::{LanguagePair, ServiceResponse, TranslationResult};
