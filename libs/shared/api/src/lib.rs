pub mod cache;
pub mod client;
pub mod resolver;

pub use cache::{process_cache, CacheKey, EntityCache, FetchFuture, NoopCache, SharedCache, STALE_AFTER};
pub use client::ApiClient;
pub use resolver::{query_string, Resource, ResourceClient};
