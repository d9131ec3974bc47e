//! Local persistence for SmartFit: domain models, key-value backends and
//! the typed plan/preferences layer built on them.

pub mod config;
pub mod error;
pub mod kv;
pub mod models;
pub mod persist;

pub use config::StoreConfig;
pub use error::StoreError;
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use persist::SavedState;
