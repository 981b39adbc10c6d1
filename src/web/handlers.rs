//! HTTP 处理器
//!
//! 输入校验失败返回 400；路由失败（语言对不支持、模型加载失败）返回 200 和
//! `{"error": ...}`，由调用方自行降级。

use std::sync::Arc;

use axum::{
    extract::{Json as ExtractJson, State},
    http::StatusCode,
    response::Json,
};

use crate::routing::ServiceResponse;
use crate::web::types::{AppState, HealthResponse, LanguagesResponse, ModelInfo, TranslateRequest};

/// `POST /translate`
pub async fn translate(
    State(state): State<Arc<AppState>>,
    ExtractJson(request): ExtractJson<TranslateRequest>,
) -> (StatusCode, Json<ServiceResponse>) {
    match state
        .service
        .resolve_and_translate(&request.text, &request.target_lang)
        .await
    {
        Ok(result) => (StatusCode::OK, Json(ServiceResponse::Success(result))),
        Err(e) if e.is_validation() => (
            StatusCode::BAD_REQUEST,
            Json(ServiceResponse::Failure {
                error: e.to_string(),
            }),
        ),
        Err(e) => (
            StatusCode::OK,
            Json(ServiceResponse::Failure {
                error: e.to_string(),
            }),
        ),
    }
}

/// `GET /health`
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let cache = state.service.router().cache();
    Json(HealthResponse {
        status: "ok",
        registered_models: cache.registry().len(),
        loaded_models: cache.len(),
        cache: cache.stats(),
        requests: state.service.stats(),
    })
}

/// `GET /languages`
pub async fn languages(State(state): State<Arc<AppState>>) -> Json<LanguagesResponse> {
    let router = state.service.router();
    let cache = router.cache();

    let models = cache
        .registry()
        .pairs()
        .into_iter()
        .map(|(pair, model)| ModelInfo {
            source: pair.source.clone(),
            target: pair.target.clone(),
            model: model.to_string(),
            loaded: cache.contains(pair),
        })
        .collect();

    Json(LanguagesResponse {
        hub_lang: router.hub_lang().to_string(),
        supported_targets: state.service.supported_targets().to_vec(),
        models,
    })
}
