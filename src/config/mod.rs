mod settings;

pub use settings::{CacheConfig, DirectoryConfig, ResolverConfig, Settings, load_settings};
