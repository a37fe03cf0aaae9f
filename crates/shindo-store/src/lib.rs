//! Storage layer: key-value port, snapshot cache, translation dictionaries.

mod error;
pub use error::StoreError;

pub mod dictionary;
pub mod file;
pub mod kv;
pub mod snapshot;

pub use dictionary::load_dictionaries;
pub use file::FileKv;
pub use kv::{KvStore, MemoryKv};
pub use snapshot::{EARTHQUAKE_CACHE_TTL, SNAPSHOT_KEY, SnapshotCache};
