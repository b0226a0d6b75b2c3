use crate::cache::{CacheStats, TtlCache};
use crate::directory::{DirectoryService, GroupInfo};
use crate::error::Result;
use std::sync::Arc;
use std::time::Duration;

/// Composite cache key: the same group name can resolve differently per
/// site.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MetadataKey {
    pub site_url: String,
    pub group_name: String,
}

/// Lazy group-metadata lookups in front of the directory service.
///
/// Pickers and tooltips ask for the same handful of groups over and over;
/// this store answers repeats from cache and collapses concurrent lookups
/// of one key into a single directory call.
pub struct GroupMetadataStore<D: DirectoryService> {
    directory: Arc<D>,
    site_url: String,
    cache: TtlCache<MetadataKey, GroupInfo>,
}

impl<D: DirectoryService> GroupMetadataStore<D> {
    pub fn new(directory: Arc<D>, site_url: impl Into<String>) -> Self {
        Self {
            directory,
            site_url: site_url.into(),
            cache: TtlCache::new(),
        }
    }

    pub fn with_ttl(directory: Arc<D>, site_url: impl Into<String>, ttl: Duration) -> Self {
        Self {
            directory,
            site_url: site_url.into(),
            cache: TtlCache::with_ttl(ttl),
        }
    }

    /// Look up a group's metadata, from cache when possible.
    pub async fn group_info(&self, group_name: &str) -> Result<GroupInfo> {
        let key = MetadataKey {
            site_url: self.site_url.clone(),
            group_name: group_name.to_string(),
        };

        self.cache
            .resolve_with_coalescing(key, || self.directory.get_group_by_name(group_name))
            .await
    }

    pub fn invalidate(&self, group_name: &str) {
        self.cache.clear(&MetadataKey {
            site_url: self.site_url.clone(),
            group_name: group_name.to_string(),
        });
    }

    pub fn invalidate_all(&self) {
        self.cache.clear_all();
    }

    pub async fn stats(&self) -> CacheStats {
        self.cache.stats().await
    }
}
