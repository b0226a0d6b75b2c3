mod ttl;

pub use ttl::{CacheStats, DEFAULT_TTL, TtlCache};
