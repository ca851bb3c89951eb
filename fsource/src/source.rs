//! Source trait, SQL capability, and the name-keyed source registry.

use std::sync::Arc;

use fcommon::Registry;

use crate::SqlHandle;

pub trait Source: Send + Sync {
    fn name(&self) -> &str;

    fn kind(&self) -> &'static str;

    /// Capability accessor for sources that can hand out an executable SQL handle.
    fn as_sql_source(&self) -> Option<&dyn SqlSource> {
        None
    }
}

pub trait SqlSource: Send + Sync {
    /// Returns a shared handle. The source stays responsible for the
    /// connections behind it.
    fn sql_handle(&self) -> Arc<dyn SqlHandle>;
}

#[derive(Default)]
pub struct SourceRegistry {
    sources: Registry<String, Arc<dyn Source>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<S>(&mut self, source: S)
    where
        S: Source + 'static,
    {
        self.register_shared(Arc::new(source));
    }

    pub fn register_shared(&mut self, source: Arc<dyn Source>) {
        let name = source.name().to_string();
        self.sources.insert(name, source);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Source>> {
        self.sources.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sources.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Arc<dyn Source>> {
        self.sources.remove(name)
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.sources.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticSource(&'static str);

    impl Source for StaticSource {
        fn name(&self) -> &str {
            self.0
        }

        fn kind(&self) -> &'static str {
            "static"
        }
    }

    #[test]
    fn registry_tracks_sources_by_name() {
        let mut registry = SourceRegistry::new();
        assert!(registry.is_empty());

        registry.register(StaticSource("beta"));
        registry.register(StaticSource("alpha"));
        assert_eq!(registry.len(), 2);
        assert!(registry.contains("alpha"));
        assert_eq!(registry.names(), vec!["alpha", "beta"]);

        let source = registry.get("beta").expect("source should be registered");
        assert_eq!(source.kind(), "static");
        assert!(source.as_sql_source().is_none());

        assert!(registry.remove("beta").is_some());
        assert!(!registry.contains("beta"));
    }
}
