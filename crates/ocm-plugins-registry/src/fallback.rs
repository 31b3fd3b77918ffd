//! The fallback component-version repository: composes several underlying
//! repositories by priority, reading from the first that has the requested
//! component and aggregating `list` across all of them.

use std::cmp::Reverse;
use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::debug;

use crate::error::RegistryResult;

/// The narrow interface a resolver must expose to participate in the
/// fallback chain. Implemented by whatever adapter (builtin or external
/// plugin) the component-version registry resolved for the resolver's
/// declared type.
#[async_trait::async_trait]
pub trait ComponentVersionResolver: Send + Sync {
    /// Fetches a descriptor by component name and version, or `Ok(None)` if
    /// this resolver doesn't have it.
    async fn get(&self, name: &str, version: &str) -> RegistryResult<Option<serde_json::Value>>;

    /// Lists every version of `name` this resolver knows about.
    async fn list(&self, name: &str) -> RegistryResult<Vec<String>>;
}

struct Resolver {
    prefix: String,
    priority: i64,
    repo: Arc<dyn ComponentVersionResolver>,
}

/// Composes resolvers in priority order. Reads try each resolver from
/// highest to lowest priority and return the first hit; writes always target
/// the highest-priority matching resolver; `list_all` aggregates across every
/// resolver concurrently, bounded by a worker-count semaphore, deduplicating
/// versions.
pub struct FallbackRepository {
    resolvers: Vec<Resolver>,
    concurrency: Arc<Semaphore>,
}

impl FallbackRepository {
    /// Builds a fallback repository from `(prefix, priority, resolver)`
    /// triples, sorted internally by descending priority. `concurrency`
    /// bounds how many resolvers `list_all` queries at once; roughly the
    /// host's CPU count is a reasonable default.
    pub fn new(mut entries: Vec<(String, i64, Arc<dyn ComponentVersionResolver>)>, concurrency: usize) -> Self {
        entries.sort_by_key(|(_, priority, _)| Reverse(*priority));
        let resolvers = entries
            .into_iter()
            .map(|(prefix, priority, repo)| Resolver { prefix, priority, repo })
            .collect();
        Self {
            resolvers,
            concurrency: Arc::new(Semaphore::new(concurrency.max(1))),
        }
    }

    fn matching(&self, name: &str) -> impl Iterator<Item = &Resolver> {
        self.resolvers.iter().filter(move |r| r.prefix.is_empty() || name.starts_with(&r.prefix))
    }

    /// Tries each matching resolver in priority order, returning the first
    /// hit.
    pub async fn get(&self, name: &str, version: &str) -> RegistryResult<Option<serde_json::Value>> {
        for resolver in self.matching(name) {
            debug!(name, version, prefix = %resolver.prefix, priority = resolver.priority, "trying resolver");
            if let Some(descriptor) = resolver.repo.get(name, version).await? {
                return Ok(Some(descriptor));
            }
        }
        Ok(None)
    }

    /// The highest-priority resolver matching `name`, used for writes.
    pub fn writer_for(&self, name: &str) -> Option<Arc<dyn ComponentVersionResolver>> {
        self.matching(name).next().map(|r| r.repo.clone())
    }

    /// Lists every version of `name` across all matching resolvers
    /// concurrently, deduplicated.
    pub async fn list_all(&self, name: &str) -> RegistryResult<Vec<String>> {
        let mut set = JoinSet::new();
        for resolver in self.matching(name) {
            let repo = resolver.repo.clone();
            let name = name.to_string();
            let permit = self.concurrency.clone();
            set.spawn(async move {
                let _permit = permit.acquire_owned().await.expect("semaphore not closed");
                repo.list(&name).await
            });
        }

        let mut seen = HashSet::new();
        let mut versions = Vec::new();
        while let Some(result) = set.join_next().await {
            match result {
                Ok(Ok(batch)) => {
                    for v in batch {
                        if seen.insert(v.clone()) {
                            versions.push(v);
                        }
                    }
                }
                Ok(Err(e)) => return Err(e),
                Err(join_err) => {
                    tracing::warn!(error = %join_err, "resolver task panicked during list_all");
                }
            }
        }
        Ok(versions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    struct FakeResolver {
        data: Mutex<Vec<(String, String)>>,
    }

    #[async_trait::async_trait]
    impl ComponentVersionResolver for FakeResolver {
        async fn get(&self, name: &str, version: &str) -> RegistryResult<Option<serde_json::Value>> {
            let hit = self.data.lock().unwrap().iter().any(|(n, v)| n == name && v == version);
            Ok(hit.then(|| json!({"name": name, "version": version})))
        }

        async fn list(&self, name: &str) -> RegistryResult<Vec<String>> {
            Ok(self
                .data
                .lock()
                .unwrap()
                .iter()
                .filter(|(n, _)| n == name)
                .map(|(_, v)| v.clone())
                .collect())
        }
    }

    fn resolver(versions: &[&str]) -> Arc<dyn ComponentVersionResolver> {
        Arc::new(FakeResolver {
            data: Mutex::new(versions.iter().map(|v| ("foo".to_string(), v.to_string())).collect()),
        })
    }

    #[tokio::test]
    async fn reads_in_priority_order() {
        let repo = FallbackRepository::new(
            vec![
                ("".to_string(), 30, resolver(&[])),
                ("".to_string(), 20, resolver(&[])),
                ("".to_string(), 10, resolver(&["1.0"])),
            ],
            4,
        );
        let found = repo.get("foo", "1.0").await.unwrap();
        assert_eq!(found.unwrap()["version"], "1.0");
    }

    #[tokio::test]
    async fn list_all_dedupes_across_resolvers() {
        let repo = FallbackRepository::new(
            vec![
                ("".to_string(), 20, resolver(&["1.0", "2.0"])),
                ("".to_string(), 10, resolver(&["2.0", "3.0"])),
            ],
            4,
        );
        let mut versions = repo.list_all("foo").await.unwrap();
        versions.sort();
        assert_eq!(versions, vec!["1.0", "2.0", "3.0"]);
    }
}
