//! 模型注册表
//!
//! 启动时由配置构建的不可变映射 `LanguagePair → model id`，定义了所有可直连的语言对。

use std::collections::HashMap;

use super::config::ModelEntry;
use super::types::LanguagePair;

#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    models: HashMap<LanguagePair, String>,
}

impl ModelRegistry {
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a ModelEntry>) -> Self {
        let models = entries
            .into_iter()
            .map(|entry| {
                (
                    LanguagePair::new(&entry.source, &entry.target),
                    entry.model.clone(),
                )
            })
            .collect();
        Self { models }
    }

    pub fn model_for(&self, pair: &LanguagePair) -> Option<&str> {
        self.models.get(pair).map(String::as_str)
    }

    /// 按语言对排序后的全部条目
    pub fn pairs(&self) -> Vec<(&LanguagePair, &str)> {
        let mut pairs: Vec<_> = self
            .models
            .iter()
            .map(|(pair, model)| (pair, model.as_str()))
            .collect();
        pairs.sort_by(|a, b| a.0.cmp(b.0));
        pairs
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::config::RouterConfig;

    #[test]
    fn test_default_registry() {
        let config = RouterConfig::default();
        let registry = ModelRegistry::from_entries(&config.models);

        assert_eq!(registry.len(), 4);
        assert_eq!(
            registry.model_for(&LanguagePair::new("hi", "en")),
            Some("Helsinki-NLP/opus-mt-hi-en")
        );
        assert_eq!(registry.model_for(&LanguagePair::new("fr", "hi")), None);
        assert_eq!(registry.model_for(&LanguagePair::new("hi", "fr")), None);
    }

    #[test]
    fn test_pairs_are_sorted() {
        let registry = ModelRegistry::from_entries(&RouterConfig::default().models);
        let pairs: Vec<String> = registry.pairs().iter().map(|(p, _)| p.to_string()).collect();
        assert_eq!(pairs, vec!["en → fr", "en → hi", "fr → en", "hi → en"]);
    }
}
