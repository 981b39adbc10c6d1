//! 统一的环境变量管理系统
//!
//! 提供类型安全、可验证的环境变量访问。每个变量一个类型，实现 `EnvVar<T>`。

use std::env;
use std::fmt;
use std::time::Duration;

/// 环境变量解析错误
#[derive(Debug, Clone)]
pub struct EnvError {
    pub variable: String,
    pub message: String,
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Environment variable '{}': {}", self.variable, self.message)
    }
}

impl std::error::Error for EnvError {}

pub type EnvResult<T> = Result<T, EnvError>;

/// 环境变量访问器特性
pub trait EnvVar<T> {
    const NAME: &'static str;
    const DEFAULT: Option<T>;
    const DESCRIPTION: &'static str;

    fn parse(value: &str) -> EnvResult<T>;

    fn get() -> EnvResult<T> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value),
            Err(_) => {
                if let Some(default) = Self::DEFAULT {
                    Ok(default)
                } else {
                    Err(EnvError {
                        variable: Self::NAME.to_string(),
                        message: "Required environment variable not set".to_string(),
                    })
                }
            }
        }
    }

    /// 只在变量被显式设置时返回值
    fn get_set() -> Option<EnvResult<T>> {
        env::var(Self::NAME).ok().map(|value| Self::parse(&value))
    }

    fn get_or_default(default: T) -> T {
        Self::get().unwrap_or(default)
    }
}

/// 核心环境变量定义
pub mod core {
    use super::*;

    /// 应用运行模式
    pub struct Mode;
    impl EnvVar<String> for Mode {
        const NAME: &'static str = "LANGROUTE_MODE";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("production".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Application mode: development, staging, production";

        fn parse(value: &str) -> EnvResult<String> {
            match value.to_lowercase().as_str() {
                "development" | "dev" => Ok("development".to_string()),
                "staging" | "stage" => Ok("staging".to_string()),
                "production" | "prod" => Ok("production".to_string()),
                _ => Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!(
                        "Invalid mode '{}'. Use: development, staging, production",
                        value
                    ),
                }),
            }
        }
    }

    /// 日志级别
    pub struct LogLevel;
    impl EnvVar<String> for LogLevel {
        const NAME: &'static str = "LANGROUTE_LOG_LEVEL";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("info".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Log level: trace, debug, info, warn, error";

        fn parse(value: &str) -> EnvResult<String> {
            match value.to_lowercase().as_str() {
                "trace" | "debug" | "info" | "warn" | "error" => Ok(value.to_lowercase()),
                _ => Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!(
                        "Invalid log level '{}'. Use: trace, debug, info, warn, error",
                        value
                    ),
                }),
            }
        }
    }
}

/// 翻译引擎（模型服务器）相关环境变量
pub mod engine {
    use super::*;

    /// 模型服务器地址
    pub struct Url;
    impl EnvVar<String> for Url {
        const NAME: &'static str = "LANGROUTE_ENGINE_URL";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("http://localhost:8008".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Model server base URL";

        fn parse(value: &str) -> EnvResult<String> {
            let url = value.trim();
            if url.starts_with("http://") || url.starts_with("https://") {
                Ok(url.to_string())
            } else {
                Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Engine URL must start with http:// or https://".to_string(),
                })
            }
        }
    }

    /// 单次请求超时
    pub struct Timeout;
    impl EnvVar<Duration> for Timeout {
        const NAME: &'static str = "LANGROUTE_ENGINE_TIMEOUT";
        const DEFAULT: Option<Duration> = Some(Duration::from_secs(120));
        const DESCRIPTION: &'static str = "Model server request timeout in seconds";

        fn parse(value: &str) -> EnvResult<Duration> {
            let seconds = parse_positive_usize(value, Self::NAME, 1, 3600)?;
            Ok(Duration::from_secs(seconds as u64))
        }
    }

    /// 生成的最大长度
    pub struct MaxLength;
    impl EnvVar<usize> for MaxLength {
        const NAME: &'static str = "LANGROUTE_ENGINE_MAX_LENGTH";
        const DEFAULT: Option<usize> = Some(512);
        const DESCRIPTION: &'static str = "Maximum generated sequence length";

        fn parse(value: &str) -> EnvResult<usize> {
            parse_positive_usize(value, Self::NAME, 1, 4096)
        }
    }
}

/// 路由相关环境变量
pub mod routing {
    use super::*;

    /// 枢纽语言
    pub struct HubLang;
    impl EnvVar<String> for HubLang {
        const NAME: &'static str = "LANGROUTE_HUB_LANG";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("en".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Pivot language used when no direct model exists";

        fn parse(value: &str) -> EnvResult<String> {
            parse_lang_code(value, Self::NAME)
        }
    }

    /// 支持的目标语言
    pub struct SupportedTargets;
    impl EnvVar<Vec<String>> for SupportedTargets {
        const NAME: &'static str = "LANGROUTE_SUPPORTED_TARGETS";
        const DEFAULT: Option<Vec<String>> = None;

        fn get() -> EnvResult<Vec<String>> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok(vec!["en".to_string(), "hi".to_string(), "fr".to_string()]),
            }
        }
        const DESCRIPTION: &'static str = "Accepted target languages (comma-separated)";

        fn parse(value: &str) -> EnvResult<Vec<String>> {
            let langs = value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| parse_lang_code(s, Self::NAME))
                .collect::<EnvResult<Vec<_>>>()?;

            if langs.is_empty() {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "At least one target language is required".to_string(),
                });
            }
            Ok(langs)
        }
    }

    /// 启动时预加载全部模型
    pub struct PreloadModels;
    impl EnvVar<bool> for PreloadModels {
        const NAME: &'static str = "LANGROUTE_PRELOAD_MODELS";
        const DEFAULT: Option<bool> = Some(false);
        const DESCRIPTION: &'static str = "Load every registered model on startup";

        fn parse(value: &str) -> EnvResult<bool> {
            parse_bool(value, Self::NAME)
        }
    }
}

/// Web服务器相关环境变量
pub mod web {
    use super::*;

    /// 绑定地址
    pub struct BindAddress;
    impl EnvVar<String> for BindAddress {
        const NAME: &'static str = "LANGROUTE_WEB_BIND_ADDRESS";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("127.0.0.1".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Web server bind address";

        fn parse(value: &str) -> EnvResult<String> {
            let addr = value.trim();
            if addr.is_empty() {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Address cannot be empty".to_string(),
                });
            }
            Ok(addr.to_string())
        }
    }

    /// 端口
    pub struct Port;
    impl EnvVar<u16> for Port {
        const NAME: &'static str = "LANGROUTE_WEB_PORT";
        const DEFAULT: Option<u16> = Some(8000);
        const DESCRIPTION: &'static str = "Web server port";

        fn parse(value: &str) -> EnvResult<u16> {
            let port: u16 = value.parse().map_err(|_| EnvError {
                variable: Self::NAME.to_string(),
                message: "Must be a valid port number (1-65535)".to_string(),
            })?;

            if port == 0 {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Port cannot be 0".to_string(),
                });
            }
            Ok(port)
        }
    }

    /// CORS允许的源
    pub struct CorsOrigins;
    impl EnvVar<Vec<String>> for CorsOrigins {
        const NAME: &'static str = "LANGROUTE_CORS_ORIGINS";
        const DEFAULT: Option<Vec<String>> = None;

        fn get() -> EnvResult<Vec<String>> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok(vec!["*".to_string()]),
            }
        }
        const DESCRIPTION: &'static str = "CORS allowed origins (comma-separated)";

        fn parse(value: &str) -> EnvResult<Vec<String>> {
            Ok(value
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect())
        }
    }
}

/// 辅助函数
fn parse_bool(value: &str, var_name: &str) -> EnvResult<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" | "enabled" => Ok(true),
        "false" | "0" | "no" | "off" | "disabled" => Ok(false),
        _ => Err(EnvError {
            variable: var_name.to_string(),
            message: format!(
                "Invalid boolean value '{}'. Use: true/false, 1/0, yes/no, on/off, enabled/disabled",
                value
            ),
        }),
    }
}

fn parse_positive_usize(value: &str, var_name: &str, min: usize, max: usize) -> EnvResult<usize> {
    let num: usize = value.trim().parse().map_err(|_| EnvError {
        variable: var_name.to_string(),
        message: "Must be a valid positive number".to_string(),
    })?;

    if num < min {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} is below minimum {}", num, min),
        });
    }

    if num > max {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} exceeds maximum {}", num, max),
        });
    }

    Ok(num)
}

fn parse_lang_code(value: &str, var_name: &str) -> EnvResult<String> {
    let lang = value.trim().to_lowercase();
    if lang.len() != 2 || !lang.chars().all(|c| c.is_ascii_lowercase()) {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Language code '{}' must be 2 letters (ISO 639-1)", value),
        });
    }
    Ok(lang)
}

/// 环境变量配置汇总
#[derive(Debug, Clone)]
pub struct EnvConfig {
    // 核心配置
    pub mode: String,
    pub log_level: String,

    // 引擎配置
    pub engine_url: String,
    pub engine_timeout: Duration,
    pub engine_max_length: usize,

    // 路由配置
    pub hub_lang: String,
    pub supported_targets: Vec<String>,
    pub preload_models: bool,

    // Web配置
    pub web_bind_address: String,
    pub web_port: u16,
    pub cors_origins: Vec<String>,
}

impl EnvConfig {
    /// 从环境变量加载全部配置
    pub fn from_env() -> EnvResult<Self> {
        Ok(Self {
            mode: core::Mode::get()?,
            log_level: core::LogLevel::get()?,

            engine_url: engine::Url::get()?,
            engine_timeout: engine::Timeout::get()?,
            engine_max_length: engine::MaxLength::get()?,

            hub_lang: routing::HubLang::get()?,
            supported_targets: routing::SupportedTargets::get()?,
            preload_models: routing::PreloadModels::get()?,

            web_bind_address: web::BindAddress::get()?,
            web_port: web::Port::get()?,
            cors_origins: web::CorsOrigins::get()?,
        })
    }

    pub fn is_development(&self) -> bool {
        self.mode == "development"
    }

    /// 输出配置摘要
    pub fn print_summary(&self) {
        tracing::info!("mode: {}, log level: {}", self.mode, self.log_level);
        tracing::info!(
            "engine: {} (timeout {:?}, max length {})",
            self.engine_url,
            self.engine_timeout,
            self.engine_max_length
        );
        tracing::info!(
            "hub: {}, targets: {}, preload: {}",
            self.hub_lang,
            self.supported_targets.join(","),
            self.preload_models
        );
        tracing::info!("web: {}:{}", self.web_bind_address, self.web_port);
    }
}

/// 生成环境变量文档
pub fn generate_env_docs() -> String {
    let mut docs = String::new();

    docs.push_str("# Environment Variables\n\n");

    docs.push_str("## Core Configuration\n\n");
    docs.push_str(&format!("- `{}`: {} (default: production)\n", core::Mode::NAME, core::Mode::DESCRIPTION));
    docs.push_str(&format!("- `{}`: {} (default: info)\n", core::LogLevel::NAME, core::LogLevel::DESCRIPTION));

    docs.push_str("\n## Engine Configuration\n\n");
    docs.push_str(&format!("- `{}`: {} (default: http://localhost:8008)\n", engine::Url::NAME, engine::Url::DESCRIPTION));
    docs.push_str(&format!("- `{}`: {} (default: {:?})\n", engine::Timeout::NAME, engine::Timeout::DESCRIPTION, engine::Timeout::DEFAULT));
    docs.push_str(&format!("- `{}`: {} (default: {:?})\n", engine::MaxLength::NAME, engine::MaxLength::DESCRIPTION, engine::MaxLength::DEFAULT));

    docs.push_str("\n## Routing Configuration\n\n");
    docs.push_str(&format!("- `{}`: {} (default: en)\n", routing::HubLang::NAME, routing::HubLang::DESCRIPTION));
    docs.push_str(&format!("- `{}`: {} (default: en,hi,fr)\n", routing::SupportedTargets::NAME, routing::SupportedTargets::DESCRIPTION));
    docs.push_str(&format!("- `{}`: {} (default: {:?})\n", routing::PreloadModels::NAME, routing::PreloadModels::DESCRIPTION, routing::PreloadModels::DEFAULT));

    docs.push_str("\n## Web Server Configuration\n\n");
    docs.push_str(&format!("- `{}`: {} (default: 127.0.0.1)\n", web::BindAddress::NAME, web::BindAddress::DESCRIPTION));
    docs.push_str(&format!("- `{}`: {} (default: {:?})\n", web::Port::NAME, web::Port::DESCRIPTION, web::Port::DEFAULT));
    docs.push_str(&format!("- `{}`: {} (default: *)\n", web::CorsOrigins::NAME, web::CorsOrigins::DESCRIPTION));

    docs
}
