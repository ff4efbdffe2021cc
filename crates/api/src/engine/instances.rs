//! Per-agent instance cache.
//!
//! Agents marked `reusable` in the catalog get one shared instance, built
//! on first use and kept for the life of the dispatcher. All other agents
//! get a fresh instance per run.

use std::collections::HashMap;
use std::sync::Arc;

use agentdeck_core::agent::Agent;
use agentdeck_core::catalog::AgentSpec;
use tokio::sync::Mutex;

/// Builds an agent instance from its catalog entry.
pub type AgentFactory = Arc<dyn Fn(&AgentSpec) -> Arc<dyn Agent> + Send + Sync>;

/// The factory used in production: [`AgentSpec::build`].
pub fn default_factory() -> AgentFactory {
    Arc::new(|spec: &AgentSpec| spec.build())
}

/// Cache of live agent instances keyed by agent name.
///
/// Owned by the dispatcher. The lock is held while building a reusable
/// instance so at most one is ever created per name.
pub struct InstanceCache {
    factory: AgentFactory,
    instances: Mutex<HashMap<String, Arc<dyn Agent>>>,
}

impl InstanceCache {
    pub fn new(factory: AgentFactory) -> Self {
        Self {
            factory,
            instances: Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached instance for a reusable agent, or a fresh one.
    pub async fn get_or_create(&self, spec: &AgentSpec) -> Arc<dyn Agent> {
        if !spec.reusable {
            return (self.factory)(spec);
        }

        let mut instances = self.instances.lock().await;
        if let Some(agent) = instances.get(&spec.name) {
            return Arc::clone(agent);
        }

        tracing::info!(agent = %spec.name, "Initializing reusable agent instance");
        let agent = (self.factory)(spec);
        instances.insert(spec.name.clone(), Arc::clone(&agent));
        agent
    }

    /// Whether a live instance is cached for `name`.
    pub async fn is_warm(&self, name: &str) -> bool {
        self.instances.lock().await.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use agentdeck_core::catalog::AgentKind;
    use agentdeck_core::executors::EchoAgent;

    use super::*;

    fn spec(name: &str, reusable: bool) -> AgentSpec {
        AgentSpec {
            name: name.into(),
            description: String::new(),
            supports_overrides: true,
            reusable,
            kind: AgentKind::Echo,
        }
    }

    fn counting_cache() -> (InstanceCache, Arc<AtomicUsize>) {
        let built = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&built);
        let factory: AgentFactory = Arc::new(move |_spec: &AgentSpec| {
            counter.fetch_add(1, Ordering::SeqCst);
            Arc::new(EchoAgent) as Arc<dyn Agent>
        });
        (InstanceCache::new(factory), built)
    }

    #[tokio::test]
    async fn reusable_agent_is_built_once() {
        let (cache, built) = counting_cache();
        let spec = spec("strategy", true);

        let a = cache.get_or_create(&spec).await;
        let b = cache.get_or_create(&spec).await;

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(built.load(Ordering::SeqCst), 1);
        assert!(cache.is_warm("strategy").await);
    }

    #[tokio::test]
    async fn non_reusable_agent_is_built_per_run() {
        let (cache, built) = counting_cache();
        let spec = spec("trading", false);

        cache.get_or_create(&spec).await;
        cache.get_or_create(&spec).await;

        assert_eq!(built.load(Ordering::SeqCst), 2);
        assert!(!cache.is_warm("trading").await);
    }

    #[tokio::test]
    async fn concurrent_first_use_builds_one_instance() {
        let (cache, built) = counting_cache();
        let cache = Arc::new(cache);
        let spec = spec("sentiment", true);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let spec = spec.clone();
                tokio::spawn(async move { cache.get_or_create(&spec).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(built.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn cold_cache_reports_not_warm() {
        let cache = InstanceCache::new(default_factory());
        assert!(!cache.is_warm("echo").await);
    }
}
