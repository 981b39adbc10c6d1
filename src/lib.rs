//! # langroute
//!
//! 为自由文本检测源语言，并把 `(source, target)` 请求路由到懒加载的翻译模型；
//! 没有直连模型时经枢纽语言（默认英语）中转。
//!
//! ## 模块组织
//!
//! - `routing` - 语言检测、模型缓存、路由和服务入口
//! - `env` - 类型安全的环境变量
//! - `telemetry` - 日志初始化
//! - `web` - HTTP 接口（可选）

pub mod env;
pub mod routing;
pub mod telemetry;
#[cfg(feature = "web")]
pub mod web;

pub use routing::{
    LanguageDetector, LanguagePair, RoutingError, RoutingResult, ServiceResponse,
    TranslationResult, TranslationRouter, TranslationService,
};
