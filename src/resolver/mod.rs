mod dedup;
mod enricher;
mod expander;
mod sorter;
#[cfg(test)]
pub(crate) mod testing;

pub use dedup::DiscoveredUser;
pub use enricher::EnrichedUser;

use crate::cache::{CacheStats, DEFAULT_TTL, TtlCache};
use crate::config::ResolverConfig;
use crate::directory::DirectoryService;
use crate::error::Result;
use crate::logging::Timer;
use crate::request::generate_resolution_id;
use crate::resolver::enricher::PhotoEnricher;
use crate::resolver::expander::Expansion;
use crate::resolver::sorter::sort_users;
use std::sync::Arc;
use std::time::Duration;

/// Resolves the full transitive user membership of a directory group.
///
/// One resolver is shared process-wide: resolved lists are cached for the
/// configured TTL and concurrent requests for the same root group collapse
/// into a single traversal. The expansion state itself is request-scoped.
pub struct GroupResolver<D: DirectoryService> {
    directory: Arc<D>,
    resolutions: TtlCache<String, Vec<EnrichedUser>>,
    config: ResolverConfig,
}

impl<D: DirectoryService> GroupResolver<D> {
    /// Create a resolver with the reference 15-minute cache TTL.
    pub fn new(directory: Arc<D>, config: ResolverConfig) -> Self {
        Self::with_cache_ttl(directory, config, DEFAULT_TTL)
    }

    /// Create a resolver with a custom cache TTL. A zero TTL disables
    /// caching entirely, which is the test configuration.
    pub fn with_cache_ttl(directory: Arc<D>, config: ResolverConfig, ttl: Duration) -> Self {
        Self {
            directory,
            resolutions: TtlCache::with_ttl(ttl),
            config,
        }
    }

    /// Resolve every user that is a member of `root_group`, directly or
    /// through nested groups, as a deduplicated list ordered by display
    /// name and enriched with photos.
    ///
    /// Fails only when the root group itself cannot be resolved; broken
    /// nested branches and failed photo fetches degrade to partial results.
    pub async fn resolve(&self, root_group: &str) -> Result<Vec<EnrichedUser>> {
        self.resolutions
            .resolve_with_coalescing(root_group.to_string(), || self.resolve_uncached(root_group))
            .await
    }

    async fn resolve_uncached(&self, root_group: &str) -> Result<Vec<EnrichedUser>> {
        let resolution_id = generate_resolution_id(root_group);
        let _timer = Timer::new(format!("resolve:{}", root_group));
        tracing::info!(
            resolution_id = %resolution_id,
            root = root_group,
            "Resolving group membership"
        );

        let mut users = Expansion::new(self.directory.as_ref()).run(root_group).await?;
        sort_users(&mut users);

        let enricher = PhotoEnricher::new(
            self.directory.as_ref(),
            &self.config.site_url,
            self.config.photo_size,
            self.config.photo_concurrency,
        );
        let enriched = enricher.enrich(users).await;

        tracing::info!(
            resolution_id = %resolution_id,
            users = enriched.len(),
            "Resolution complete"
        );
        Ok(enriched)
    }

    /// Drop the cached result for one root group, e.g. when the caller
    /// switches away from it.
    pub fn invalidate(&self, root_group: &str) {
        self.resolutions.clear(&root_group.to_string());
    }

    /// Drop every cached result.
    pub fn invalidate_all(&self) {
        self.resolutions.clear_all();
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.resolutions.stats().await
    }
}
