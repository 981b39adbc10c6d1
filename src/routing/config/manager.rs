//! 配置管理器
//!
//! 提供统一的配置接口，支持文件配置、环境变量和默认值

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::constants;
use crate::routing::error::{RoutingError, RoutingResult};

/// 模型表中的一项
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ModelEntry {
    pub source: String,
    pub target: String,
    pub model: String,
}

/// 模型服务器配置
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_length: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_url: constants::DEFAULT_ENGINE_URL.to_string(),
            timeout_secs: constants::DEFAULT_ENGINE_TIMEOUT.as_secs(),
            max_length: constants::DEFAULT_MAX_LENGTH,
        }
    }
}

impl EngineConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// 路由配置
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RouterConfig {
    // 路由
    pub hub_lang: String,
    pub supported_targets: Vec<String>,

    // 模型表
    pub models: Vec<ModelEntry>,

    // 引擎
    pub engine: EngineConfig,

    // 功能开关
    pub preload_models: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            hub_lang: constants::DEFAULT_HUB_LANG.to_string(),
            supported_targets: constants::DEFAULT_SUPPORTED_TARGETS
                .iter()
                .map(|lang| lang.to_string())
                .collect(),
            models: constants::DEFAULT_MODELS
                .iter()
                .map(|(source, target, model)| ModelEntry {
                    source: source.to_string(),
                    target: target.to_string(),
                    model: model.to_string(),
                })
                .collect(),
            engine: EngineConfig::default(),
            preload_models: false,
        }
    }
}

impl RouterConfig {
    /// 验证配置
    pub fn validate(&self) -> RoutingResult<()> {
        if self.hub_lang.trim().is_empty() {
            return Err(RoutingError::ConfigError("hub language cannot be empty".to_string()));
        }

        if self.supported_targets.is_empty() {
            return Err(RoutingError::ConfigError(
                "at least one supported target is required".to_string(),
            ));
        }

        for lang in &self.supported_targets {
            if lang.len() != 2 || !lang.chars().all(|c| c.is_ascii_lowercase()) {
                return Err(RoutingError::ConfigError(format!(
                    "supported target '{}' must be a 2-letter lowercase code",
                    lang
                )));
            }
        }

        if self.models.is_empty() {
            return Err(RoutingError::ConfigError("model table cannot be empty".to_string()));
        }

        let mut seen = HashSet::new();
        for entry in &self.models {
            if entry.source.trim().is_empty()
                || entry.target.trim().is_empty()
                || entry.model.trim().is_empty()
            {
                return Err(RoutingError::ConfigError(format!(
                    "incomplete model entry: {:?}",
                    entry
                )));
            }

            let key = (entry.source.to_lowercase(), entry.target.to_lowercase());
            if key.0 == key.1 {
                return Err(RoutingError::ConfigError(format!(
                    "model {} maps {} onto itself",
                    entry.model, key.0
                )));
            }
            if !seen.insert(key) {
                return Err(RoutingError::ConfigError(format!(
                    "duplicate model entry for {} → {}",
                    entry.source, entry.target
                )));
            }
        }

        let url = &self.engine.base_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(RoutingError::ConfigError(format!(
                "engine URL must start with http:// or https://: {}",
                url
            )));
        }

        if self.engine.timeout_secs == 0 {
            return Err(RoutingError::ConfigError("engine timeout cannot be 0".to_string()));
        }

        if self.engine.max_length == 0 {
            return Err(RoutingError::ConfigError("engine max_length cannot be 0".to_string()));
        }

        Ok(())
    }

    /// 应用环境变量覆盖
    ///
    /// 只有显式设置的变量才会覆盖文件中的值；格式错误的变量会被报告。
    pub fn apply_env_overrides(&mut self) -> RoutingResult<()> {
        use crate::env::{engine, routing, EnvVar};

        if let Some(url) = engine::Url::get_set() {
            self.engine.base_url = url?;
            tracing::info!("engine URL overridden by environment: {}", self.engine.base_url);
        }

        if let Some(timeout) = engine::Timeout::get_set() {
            self.engine.timeout_secs = timeout?.as_secs();
        }

        if let Some(max_length) = engine::MaxLength::get_set() {
            self.engine.max_length = max_length?;
        }

        if let Some(hub) = routing::HubLang::get_set() {
            self.hub_lang = hub?;
        }

        if let Some(targets) = routing::SupportedTargets::get_set() {
            self.supported_targets = targets?;
        }

        if let Some(preload) = routing::PreloadModels::get_set() {
            self.preload_models = preload?;
        }

        Ok(())
    }

    /// 统一小写语言代码
    fn normalize(&mut self) {
        self.hub_lang = self.hub_lang.trim().to_lowercase();
        for lang in &mut self.supported_targets {
            *lang = lang.trim().to_lowercase();
        }
        for entry in &mut self.models {
            entry.source = entry.source.trim().to_lowercase();
            entry.target = entry.target.trim().to_lowercase();
            entry.model = entry.model.trim().to_string();
        }
        self.engine.base_url = self.engine.base_url.trim().to_string();
    }
}

/// 配置管理器
pub struct ConfigManager {
    config: RouterConfig,
}

impl ConfigManager {
    /// 搜索默认路径加载配置，再应用环境变量覆盖
    pub fn new() -> RoutingResult<Self> {
        let config = Self::load_config()?;
        Self::finish(config)
    }

    /// 从指定文件加载配置
    pub fn from_file(path: &str) -> RoutingResult<Self> {
        Self::load_dotenv();
        let config = Self::load_from_file(&shellexpand::tilde(path))?;
        Self::finish(config)
    }

    /// 直接使用给定配置（仍会校验）
    pub fn with_config(mut config: RouterConfig) -> RoutingResult<Self> {
        config.normalize();
        config.validate()?;
        Ok(Self { config })
    }

    fn finish(mut config: RouterConfig) -> RoutingResult<Self> {
        config.apply_env_overrides()?;
        Self::with_config(config)
    }

    /// 获取配置
    pub fn get_config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn into_config(self) -> RouterConfig {
        self.config
    }

    fn load_config() -> RoutingResult<RouterConfig> {
        Self::load_dotenv();

        for path in constants::CONFIG_PATHS {
            let expanded_path = shellexpand::tilde(path);
            if Path::new(expanded_path.as_ref()).exists() {
                tracing::info!("loading config file: {}", expanded_path);
                return Self::load_from_file(&expanded_path);
            }
        }

        tracing::info!("no config file found, using defaults");
        Ok(RouterConfig::default())
    }

    /// 按扩展名解析：`.toml` 用 TOML，其余按 JSON
    fn load_from_file(path: &str) -> RoutingResult<RouterConfig> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RoutingError::ConfigError(format!("failed to read config file {}: {}", path, e))
        })?;

        if path.ends_with(".toml") {
            Ok(toml::from_str(&content)?)
        } else {
            Ok(serde_json::from_str(&content)?)
        }
    }

    fn load_dotenv() {
        match dotenv::dotenv() {
            Ok(path) => tracing::debug!("loaded .env file: {:?}", path),
            Err(e) => tracing::trace!("no .env file loaded: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = RouterConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.models.len(), 4);
        assert_eq!(config.hub_lang, "en");
    }

    #[test]
    fn test_toml_config_parsing() {
        let toml_src = r#"
            hub_lang = "en"
            supported_targets = ["en", "hi", "fr", "de"]

            [engine]
            base_url = "http://models.internal:9000"
            max_length = 256

            [[models]]
            source = "en"
            target = "de"
            model = "Helsinki-NLP/opus-mt-en-de"
        "#;

        let config: RouterConfig = toml::from_str(toml_src).unwrap();
        assert_eq!(config.models.len(), 1);
        assert_eq!(config.engine.max_length, 256);
        assert_eq!(config.engine.timeout_secs, constants::DEFAULT_ENGINE_TIMEOUT.as_secs());
        assert!(!config.preload_models);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_json_config_uses_defaults_for_missing_fields() {
        let config: RouterConfig = serde_json::from_str(r#"{"preload_models": true}"#).unwrap();
        assert!(config.preload_models);
        assert_eq!(config.models.len(), constants::DEFAULT_MODELS.len());
    }

    #[test]
    fn test_validation_rejects_bad_models() {
        let mut config = RouterConfig::default();
        config.models.push(ModelEntry {
            source: "en".to_string(),
            target: "hi".to_string(),
            model: "another".to_string(),
        });
        assert!(config.validate().is_err());

        let mut config = RouterConfig::default();
        config.models = vec![ModelEntry {
            source: "fr".to_string(),
            target: "fr".to_string(),
            model: "noop".to_string(),
        }];
        assert!(config.validate().is_err());

        let mut config = RouterConfig::default();
        config.models.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_bad_engine_and_targets() {
        let mut config = RouterConfig::default();
        config.engine.base_url = "localhost:8008".to_string();
        assert!(config.validate().is_err());

        let mut config = RouterConfig::default();
        config.engine.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = RouterConfig::default();
        config.supported_targets = vec!["english".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_with_config_normalizes_codes() {
        let mut config = RouterConfig::default();
        config.hub_lang = " EN ".to_string();
        config.supported_targets = vec!["FR".to_string()];
        config.models = vec![ModelEntry {
            source: "EN".to_string(),
            target: "Fr".to_string(),
            model: " Helsinki-NLP/opus-mt-en-fr ".to_string(),
        }];

        let manager = ConfigManager::with_config(config).unwrap();
        let config = manager.get_config();
        assert_eq!(config.hub_lang, "en");
        assert_eq!(config.supported_targets, vec!["fr"]);
        assert_eq!(config.models[0].source, "en");
        assert_eq!(config.models[0].target, "fr");
        assert_eq!(config.models[0].model, "Helsinki-NLP/opus-mt-en-fr");
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = ConfigManager::from_file("/nonexistent/langroute.toml");
        assert!(matches!(result, Err(RoutingError::ConfigError(_))));
    }
}
