//! Lazy, TTL-cached lookups of directory metadata
//!
//! Metadata is fetched on demand the first time a caller asks for it, held
//! for the cache TTL, and concurrent lookups of the same key share one
//! directory round trip. Same cache primitive as group resolution.

mod store;

pub use store::{GroupMetadataStore, MetadataKey};
