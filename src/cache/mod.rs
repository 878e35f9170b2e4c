/// Client-side data cache.
///
/// `store` holds the process-wide map of cache entries with TTL-based
/// staleness and stale-while-revalidate refresh; `dedupe` collapses
/// concurrent imperative fetches for one key into a single request;
/// `key` builds canonical cache keys from typed resource descriptions.

pub mod dedupe;
pub mod key;
pub mod store;

pub use dedupe::Deduplicator;
pub use key::CacheKey;
pub use store::{CacheEntry, CacheStore, FetchResult, SubscriptionId};
