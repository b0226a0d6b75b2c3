use crate::directory::PhotoSize;
use crate::error::{GroupResolverError, Result};

#[derive(Debug, Clone)]
pub struct Settings {
    pub directory: DirectoryConfig,
    pub resolver: ResolverConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    pub base_url: String,
    pub auth_token: Option<String>,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub site_url: String,
    pub photo_concurrency: usize,
    pub photo_size: PhotoSize,
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub ttl_secs: u64,
}

pub fn load_settings() -> Result<Settings> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Load directory service config
    let base_url = std::env::var("DIRECTORY_BASE_URL")
        .map_err(|_| GroupResolverError::Config("DIRECTORY_BASE_URL not set".to_string()))?;

    let directory = DirectoryConfig {
        base_url: base_url.clone(),
        auth_token: std::env::var("DIRECTORY_AUTH_TOKEN").ok(),
        request_timeout_secs: std::env::var("DIRECTORY_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .map_err(|_| GroupResolverError::Config("Invalid DIRECTORY_TIMEOUT_SECS".to_string()))?,
    };

    // Load resolver config
    let resolver = ResolverConfig {
        // Photo fetches are addressed per site; defaults to the directory root
        site_url: std::env::var("RESOLVER_SITE_URL").unwrap_or(base_url),
        photo_concurrency: std::env::var("RESOLVER_PHOTO_CONCURRENCY")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .map_err(|_| {
                GroupResolverError::Config("Invalid RESOLVER_PHOTO_CONCURRENCY".to_string())
            })?,
        photo_size: std::env::var("RESOLVER_PHOTO_SIZE")
            .unwrap_or_else(|_| "M".to_string())
            .parse()
            .map_err(|_| GroupResolverError::Config("Invalid RESOLVER_PHOTO_SIZE".to_string()))?,
    };

    // Load cache config (15 minute TTL by default)
    let cache = CacheConfig {
        ttl_secs: std::env::var("CACHE_TTL_SECS")
            .unwrap_or_else(|_| "900".to_string())
            .parse()
            .map_err(|_| GroupResolverError::Config("Invalid CACHE_TTL_SECS".to_string()))?,
    };

    Ok(Settings {
        directory,
        resolver,
        cache,
    })
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            site_url: String::new(),
            photo_concurrency: 5,
            photo_size: PhotoSize::Medium,
        }
    }
}
