//! Provider registry: factories keyed by id, instantiated on first use.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::error::AnalysisError;
use crate::providers::{
    AnalysisProvider, AnthropicProvider, GeminiProvider, OpenAiCompatProvider, ProviderId,
};

pub type ProviderFactory =
    Box<dyn Fn() -> Result<Arc<dyn AnalysisProvider>, AnalysisError> + Send + Sync>;

#[derive(Default)]
pub struct ProviderRegistry {
    factories: HashMap<ProviderId, ProviderFactory>,
    cache: Mutex<HashMap<ProviderId, Arc<dyn AnalysisProvider>>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in backend.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(ProviderId::Gemini, || Ok(Arc::new(GeminiProvider::new()?)));
        registry.register(ProviderId::OpenAi, || Ok(Arc::new(OpenAiCompatProvider::openai()?)));
        registry.register(ProviderId::Grok, || Ok(Arc::new(OpenAiCompatProvider::grok()?)));
        registry.register(ProviderId::Anthropic, || Ok(Arc::new(AnthropicProvider::new()?)));
        registry.register(ProviderId::OpenRouter, || {
            Ok(Arc::new(OpenAiCompatProvider::openrouter()?))
        });
        registry
    }

    /// Add or replace a factory. A cached instance for `id` is dropped.
    pub fn register<F>(&mut self, id: ProviderId, factory: F)
    where
        F: Fn() -> Result<Arc<dyn AnalysisProvider>, AnalysisError> + Send + Sync + 'static,
    {
        self.factories.insert(id, Box::new(factory));
        self.lock_cache().remove(&id);
    }

    pub fn is_registered(&self, id: ProviderId) -> bool {
        self.factories.contains_key(&id)
    }

    pub fn is_cached(&self, id: ProviderId) -> bool {
        self.lock_cache().contains_key(&id)
    }

    /// Cached instance for `id`, building it on first request.
    pub fn get(&self, id: ProviderId) -> Result<Arc<dyn AnalysisProvider>, AnalysisError> {
        if let Some(provider) = self.lock_cache().get(&id) {
            return Ok(Arc::clone(provider));
        }

        let factory = self
            .factories
            .get(&id)
            .ok_or_else(|| AnalysisError::UnknownProvider(id.to_string()))?;
        let provider = factory()?;
        debug!(provider = %id, "Instantiated analysis provider");

        // Another caller may have won the race; keep the first instance.
        let mut cache = self.lock_cache();
        let cached = cache.entry(id).or_insert(provider);
        Ok(Arc::clone(cached))
    }

    pub fn get_by_name(&self, name: &str) -> Result<Arc<dyn AnalysisProvider>, AnalysisError> {
        self.get(name.parse()?)
    }

    /// Build `id` ahead of its first use.
    pub fn preload(&self, id: ProviderId) -> Result<(), AnalysisError> {
        self.get(id).map(|_| ())
    }

    pub fn clear_cache(&self) {
        self.lock_cache().clear();
    }

    fn lock_cache(&self) -> MutexGuard<'_, HashMap<ProviderId, Arc<dyn AnalysisProvider>>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::AnalysisRequest;
    use chess_core::AnalysisReport;
    use futures::future::BoxFuture;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Canned(ProviderId);

    impl AnalysisProvider for Canned {
        fn id(&self) -> ProviderId {
            self.0
        }

        fn analyze<'a>(
            &'a self,
            _request: &'a AnalysisRequest<'a>,
        ) -> BoxFuture<'a, Result<AnalysisReport, AnalysisError>> {
            Box::pin(async { Ok(AnalysisReport::default()) })
        }
    }

    fn counting_registry() -> (ProviderRegistry, Arc<AtomicUsize>) {
        let built = Arc::new(AtomicUsize::new(0));
        let mut registry = ProviderRegistry::new();
        let counter = Arc::clone(&built);
        registry.register(ProviderId::Grok, move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(Canned(ProviderId::Grok)))
        });
        (registry, built)
    }

    #[test]
    fn test_instances_are_built_lazily_and_cached() {
        let (registry, built) = counting_registry();
        assert_eq!(built.load(Ordering::SeqCst), 0);
        assert!(!registry.is_cached(ProviderId::Grok));

        let first = registry.get(ProviderId::Grok).unwrap();
        let second = registry.get(ProviderId::Grok).unwrap();
        assert_eq!(built.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.id(), ProviderId::Grok);
    }

    #[test]
    fn test_preload_and_clear_cache() {
        let (registry, built) = counting_registry();
        registry.preload(ProviderId::Grok).unwrap();
        assert!(registry.is_cached(ProviderId::Grok));

        registry.clear_cache();
        assert!(!registry.is_cached(ProviderId::Grok));
        registry.get(ProviderId::Grok).unwrap();
        assert_eq!(built.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_unregistered_and_unknown_names() {
        let (registry, _) = counting_registry();
        assert!(matches!(
            registry.get(ProviderId::Gemini),
            Err(AnalysisError::UnknownProvider(name)) if name == "gemini"
        ));
        assert!(matches!(
            registry.get_by_name("llama"),
            Err(AnalysisError::UnknownProvider(_))
        ));
        assert!(registry.get_by_name("GROK").is_ok());
    }

    #[test]
    fn test_defaults_cover_every_provider() {
        let registry = ProviderRegistry::with_defaults();
        for id in ProviderId::ALL {
            assert!(registry.is_registered(id));
            assert_eq!(registry.get(id).unwrap().id(), id);
        }
    }
}
