// Cache module for memoizing expensive upstream aggregates.
// Purely in-memory; nothing survives a restart.

pub mod store;

pub use store::{CacheCoordinator, CacheEntry, CacheInfo, DEFAULT_TTL};
