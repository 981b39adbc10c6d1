//! 路由配置管理模块
//!
//! 支持配置文件（TOML / JSON）、环境变量和默认值

pub mod manager;

// 重新导出主要类型
pub use manager::{ConfigManager, EngineConfig, ModelEntry, RouterConfig};

/// 配置常量
pub mod constants {
    use std::time::Duration;

    /// 默认枢纽语言
    pub const DEFAULT_HUB_LANG: &str = "en";

    /// 默认接受的目标语言
    pub const DEFAULT_SUPPORTED_TARGETS: &[&str] = &["en", "hi", "fr"];

    /// 默认模型表：(source, target, model id)
    pub const DEFAULT_MODELS: &[(&str, &str, &str)] = &[
        ("en", "hi", "Helsinki-NLP/opus-mt-en-hi"),
        ("hi", "en", "Helsinki-NLP/opus-mt-hi-en"),
        ("en", "fr", "Helsinki-NLP/opus-mt-en-fr"),
        ("fr", "en", "Helsinki-NLP/opus-mt-fr-en"),
    ];

    // 模型服务器
    pub const DEFAULT_ENGINE_URL: &str = "http://localhost:8008";
    pub const DEFAULT_ENGINE_TIMEOUT: Duration = Duration::from_secs(120);
    pub const DEFAULT_MAX_LENGTH: usize = 512;

    // 配置文件搜索路径
    pub const CONFIG_PATHS: &[&str] = &[
        "langroute.toml",
        ".langroute.toml",
        "langroute.json",
        "~/.config/langroute/config.toml",
        "/etc/langroute/config.toml",
    ];
}
