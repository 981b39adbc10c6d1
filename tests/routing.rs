//! 路由集成测试
//!
//! 直连、经枢纽语言中转、失败传播

use langroute::routing::{LanguagePair, RoutingError};

mod common;

use common::{TestEnvironment, POISON};

#[tokio::test]
async fn test_identity_pair_is_noop() {
    let env = TestEnvironment::new();

    for lang in ["en", "hi", "fr", "de"] {
        let out = env.router.translate("unchanged text", lang, lang).await.unwrap();
        assert_eq!(out, "unchanged text");
    }

    assert_eq!(env.provider.attempts(), 0, "identity pairs must not touch the cache");
}

#[tokio::test]
async fn test_direct_translation() {
    let env = TestEnvironment::new();

    let out = env.router.translate("नमस्ते", "hi", "en").await.unwrap();
    assert_eq!(out, "Hello");
    assert_eq!(env.provider.loads(), 1);
    assert!(env.cache.contains(&LanguagePair::new("hi", "en")));
}

#[tokio::test]
async fn test_pivot_matches_manual_composition() {
    let pivot_env = TestEnvironment::new();
    let pivoted = pivot_env.router.translate("धन्यवाद", "hi", "fr").await.unwrap();

    let manual_env = TestEnvironment::new();
    let intermediate = manual_env.router.translate("धन्यवाद", "hi", "en").await.unwrap();
    let composed = manual_env.router.translate(&intermediate, "en", "fr").await.unwrap();

    assert_eq!(pivoted, "Merci");
    assert_eq!(pivoted, composed);

    // hi→fr 本身没有进入缓存，只加载了两条腿
    assert!(!pivot_env.cache.contains(&LanguagePair::new("hi", "fr")));
    assert!(pivot_env.cache.contains(&LanguagePair::new("hi", "en")));
    assert!(pivot_env.cache.contains(&LanguagePair::new("en", "fr")));
    assert_eq!(pivot_env.provider.loads(), 2);
}

#[tokio::test]
async fn test_pivot_for_unknown_phrase_chains_both_engines() {
    let env = TestEnvironment::new();
    let out = env.router.translate("Salut", "fr", "hi").await.unwrap();
    assert_eq!(out, "[hi] [en] Salut");
}

#[tokio::test]
async fn test_no_pivot_when_hub_is_an_endpoint() {
    let env = TestEnvironment::new();

    let err = env.router.translate("Hello", "en", "de").await.unwrap_err();
    assert_eq!(err, RoutingError::unsupported_pair("en", "de"));

    let err = env.router.translate("مرحبا", "ar", "en").await.unwrap_err();
    assert_eq!(err, RoutingError::unsupported_pair("ar", "en"));

    assert_eq!(env.provider.attempts(), 0);
}

#[tokio::test]
async fn test_unsupported_first_leg_fails_fast() {
    let env = TestEnvironment::new();

    let err = env.router.translate("مرحبا", "ar", "fr").await.unwrap_err();
    assert_eq!(err, RoutingError::unsupported_pair("ar", "en"));
    assert_eq!(env.provider.attempts(), 0);
}

#[tokio::test]
async fn test_unsupported_second_leg_returns_no_partial_output() {
    let env = TestEnvironment::new();

    let result = env.router.translate("नमस्ते", "hi", "de").await;
    assert_eq!(result, Err(RoutingError::unsupported_pair("en", "de")));
    // 第一条腿已经加载，但结果被丢弃
    assert_eq!(env.provider.loads(), 1);
}

#[tokio::test]
async fn test_direct_load_failure_does_not_pivot() {
    let env = TestEnvironment::new();
    env.provider.fail_next(LanguagePair::new("en", "hi"), 1);

    let err = env.router.translate("Hello", "en", "hi").await.unwrap_err();
    match err {
        RoutingError::ModelLoadFailure { model, pair, reason } => {
            assert_eq!(model, "Helsinki-NLP/opus-mt-en-hi");
            assert_eq!(pair, "en → hi");
            assert!(reason.contains("503"), "reason: {}", reason);
        }
        other => panic!("expected load failure, got {:?}", other),
    }

    // 失败没有被缓存，重试成功
    let out = env.router.translate("Hello", "en", "hi").await.unwrap();
    assert_eq!(out, "नमस्ते");
}

#[tokio::test]
async fn test_pivot_propagates_innermost_load_failure() {
    let env = TestEnvironment::new();
    env.provider.fail_next(LanguagePair::new("en", "fr"), 1);

    let err = env.router.translate("नमस्ते", "hi", "fr").await.unwrap_err();
    assert!(
        matches!(&err, RoutingError::ModelLoadFailure { pair, .. } if pair == "en → fr"),
        "unexpected error: {:?}",
        err
    );
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_engine_failure_is_reported() {
    let env = TestEnvironment::new();

    let err = env
        .router
        .translate(&format!("Hello {}", POISON), "en", "fr")
        .await
        .unwrap_err();
    match err {
        RoutingError::EngineFailure(message) => {
            assert!(message.contains("Helsinki-NLP/opus-mt-en-fr"));
            assert!(message.contains("decoder crashed"));
        }
        other => panic!("expected engine failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_language_codes_are_case_insensitive() {
    let env = TestEnvironment::new();
    let out = env.router.translate("नमस्ते", "HI", "En").await.unwrap();
    assert_eq!(out, "Hello");
}
