//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (keys and touches to steering)
//! - Storage (LocalStorage on web, in-memory elsewhere)

pub mod input;
pub mod storage;

pub use input::{InputAction, action_for_key, steering_for_touch};
pub use storage::{KeyValueStore, MemoryStore, StorageError, default_store};
