//! 源语言检测
//!
//! 先用字符区间做确定性判断（天城文、阿拉伯文、拉丁字母），只有真正有歧义的
//! 文本才交给统计检测器。统计检测器对短文本或混合文本可能给出不稳定的结果，
//! 这是可接受的分类噪声。

use std::sync::Arc;

use whatlang::Detector;

/// 天城文区间 U+0900–U+097F
const DEVANAGARI: std::ops::RangeInclusive<char> = '\u{0900}'..='\u{097F}';
/// 阿拉伯文区间 U+0600–U+06FF
const ARABIC: std::ops::RangeInclusive<char> = '\u{0600}'..='\u{06FF}';

/// 统计语言识别能力
///
/// 返回检测到的语言代码（任意形式，如 `fra`、`fr`），无法识别时返回 `None`。
/// 调用方只按前缀归一化结果。
pub trait StatisticalDetector: Send + Sync {
    fn identify(&self, text: &str) -> Option<String>;
}

/// 基于 whatlang 的统计检测器（三元组模型）
pub struct WhatlangDetector {
    detector: Detector,
}

impl WhatlangDetector {
    pub fn new() -> Self {
        Self {
            detector: Detector::new(),
        }
    }
}

impl Default for WhatlangDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl StatisticalDetector for WhatlangDetector {
    fn identify(&self, text: &str) -> Option<String> {
        // whatlang 使用 ISO 639-3 代码：fra、hin、eng ...
        self.detector
            .detect(text)
            .map(|info| info.lang().code().to_string())
    }
}

/// 语言检测器
#[derive(Clone)]
pub struct LanguageDetector {
    statistical: Arc<dyn StatisticalDetector>,
}

impl LanguageDetector {
    pub fn new(statistical: Arc<dyn StatisticalDetector>) -> Self {
        Self { statistical }
    }

    /// 检测文本的源语言，返回归一化后的语言代码
    ///
    /// 优先级（首个命中即返回）：
    /// 1. 含天城文字符 → `hi`
    /// 2. 含阿拉伯文字符 → `ar`
    /// 3. 含 ASCII 字母 → 统计检测，以 `fr` 开头为 `fr`，否则 `en`
    /// 4. 其余 → 统计检测，按前缀归一化为 `hi` / `fr` / `en`
    pub fn detect(&self, text: &str) -> String {
        if text.chars().any(|c| DEVANAGARI.contains(&c)) {
            return "hi".to_string();
        }

        if text.chars().any(|c| ARABIC.contains(&c)) {
            return "ar".to_string();
        }

        let detected = self.statistical.identify(text);
        tracing::trace!(?detected, "statistical detector result");

        if text.chars().any(|c| c.is_ascii_alphabetic()) {
            return match detected.as_deref() {
                Some(code) if code.starts_with("fr") => "fr",
                _ => "en",
            }
            .to_string();
        }

        match detected.as_deref() {
            Some(code) if code.starts_with("hi") => "hi",
            Some(code) if code.starts_with("fr") => "fr",
            _ => "en",
        }
        .to_string()
    }
}

impl Default for LanguageDetector {
    fn default() -> Self {
        Self::new(Arc::new(WhatlangDetector::new()))
    }
}
