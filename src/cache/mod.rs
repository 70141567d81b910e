//! In-memory page cache keyed by request URL.

pub mod cache;
pub mod entry;
pub mod shard;


pub use cache::{PageCache, Storage};
pub use entry::CacheEntry;
pub use shard::Lookup;
