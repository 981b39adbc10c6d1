//! Web 服务器模块
//!
//! 为翻译路由提供 HTTP 接口：
//! - `POST /translate` - `{text, target_lang}` → `{source_lang, target_lang, translated_text}` 或 `{error}`
//! - `GET /health` - 缓存与请求统计
//! - `GET /languages` - 支持的目标语言与模型表

pub mod config;
pub mod handlers;
pub mod types;

pub use config::WebConfig;
pub use types::AppState;

use std::sync::Arc;

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::routing::{RoutingError, RoutingResult, TranslationService};

/// 创建路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/translate", post(handlers::translate))
        .route("/health", get(handlers::health))
        .route("/languages", get(handlers::languages))
}

/// 创建带 CORS 的应用
pub fn create_app(app_state: Arc<AppState>, config: &WebConfig) -> Router {
    create_routes()
        .with_state(app_state)
        .layer(cors_layer(config))
}

fn cors_layer(config: &WebConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.allows_any_origin() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}

/// Web 服务器
pub struct WebServer {
    config: WebConfig,
    service: Arc<TranslationService>,
}

impl WebServer {
    pub fn new(config: WebConfig, service: TranslationService) -> Self {
        Self {
            config,
            service: Arc::new(service),
        }
    }

    /// 启动 Web 服务器
    pub async fn start(&self) -> RoutingResult<()> {
        let app_state = Arc::new(AppState {
            service: Arc::clone(&self.service),
        });
        let app = create_app(app_state, &self.config);

        let address = format!("{}:{}", self.config.bind_addr, self.config.port);
        let listener = tokio::net::TcpListener::bind(&address)
            .await
            .map_err(|e| RoutingError::ConfigError(format!("failed to bind {}: {}", address, e)))?;

        tracing::info!("web server listening on http://{}", address);

        axum::serve(listener, app)
            .await
            .map_err(|e| RoutingError::ConfigError(format!("server error: {}", e)))?;

        Ok(())
    }
}
