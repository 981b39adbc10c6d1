//! 翻译引擎接口
//!
//! 引擎本身（分词 + 序列生成）对路由层是不透明的：`EngineProvider` 根据模型标识
//! 加载一个引擎，引擎只暴露 `translate(text) -> text`。
//!
//! 默认实现 `HttpEngineProvider` 把模型托管在独立的模型服务器上：
//! - 加载：`GET {base_url}/models/{model_id}`，2xx 表示模型已就绪
//! - 翻译：`POST {base_url}/translate`，请求体 `{"model", "text", "max_length"}`，
//!   响应体 `{"translation"}`

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use super::config::EngineConfig;
use super::types::LanguagePair;

/// 引擎层错误
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("model server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("{0}")]
    Other(String),
}

/// 已加载的翻译引擎，绑定到一个语言对
#[async_trait]
pub trait TranslationEngine: Send + Sync {
    /// 模型标识
    fn model(&self) -> &str;

    async fn translate(&self, text: &str) -> Result<String, EngineError>;
}

/// 缓存中共享的引擎句柄
pub type LoadedEngine = Arc<dyn TranslationEngine>;

/// 引擎提供者：给定模型标识，加载一个引擎（可能很慢、涉及 I/O）
#[async_trait]
pub trait EngineProvider: Send + Sync {
    async fn load(&self, pair: &LanguagePair, model: &str) -> Result<LoadedEngine, EngineError>;
}

#[derive(Serialize)]
struct TranslateRequest<'a> {
    model: &'a str,
    text: &'a str,
    max_length: usize,
}

#[derive(Deserialize)]
struct TranslateReply {
    translation: String,
}

/// 基于 HTTP 模型服务器的引擎提供者
pub struct HttpEngineProvider {
    client: reqwest::Client,
    base_url: Url,
    max_length: usize,
}

impl HttpEngineProvider {
    pub fn new(config: &EngineConfig) -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        let base_url = Url::parse(&config.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(EngineError::Other(format!(
                "engine URL cannot be used as a base: {}",
                config.base_url
            )));
        }

        Ok(Self {
            client,
            base_url,
            max_length: config.max_length,
        })
    }

    /// 在基础地址后追加路径段；模型标识中的 `/` 会被编码为单个路径段的一部分
    fn endpoint(&self, segments: &[&str]) -> Result<Url, EngineError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| EngineError::Other("engine URL cannot be used as a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl EngineProvider for HttpEngineProvider {
    async fn load(&self, pair: &LanguagePair, model: &str) -> Result<LoadedEngine, EngineError> {
        let url = self.endpoint(&["models", model])?;
        tracing::debug!(%pair, %url, "probing model server");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EngineError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(Arc::new(HttpEngine {
            client: self.client.clone(),
            endpoint: self.endpoint(&["translate"])?,
            model: model.to_string(),
            max_length: self.max_length,
        }))
    }
}

/// 托管在模型服务器上的引擎
struct HttpEngine {
    client: reqwest::Client,
    endpoint: Url,
    model: String,
    max_length: usize,
}

#[async_trait]
impl TranslationEngine for HttpEngine {
    fn model(&self) -> &str {
        &self.model
    }

    async fn translate(&self, text: &str) -> Result<String, EngineError> {
        let request = TranslateRequest {
            model: &self.model,
            text,
            max_length: self.max_length,
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EngineError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let reply: TranslateReply = response.json().await?;
        Ok(reply.translation)
    }
}
