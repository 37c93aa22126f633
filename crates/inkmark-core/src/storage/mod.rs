//! Scene persistence.
//!
//! A backend stores one serialized shape list per key. The scene saves after
//! every committed mutation and loads once when it opens.

mod memory;
pub mod snapshot;

#[cfg(not(target_arch = "wasm32"))]
mod file;

pub use memory::MemoryStorage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

use crate::shapes::Shape;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    /// Nothing stored under the key. A scene opened on it starts empty.
    #[error("No scene stored under {0:?}")]
    NotFound(String),
    /// Stored data is not a valid shape list.
    #[error("Malformed scene snapshot: {0}")]
    Serialization(String),
    #[error("Storage I/O failed: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// A place scenes are kept between sessions.
///
/// Calls are synchronous: a save finishes before the input handler that
/// caused it returns.
pub trait Storage: Send + Sync {
    /// Store `shapes` under `key`, replacing what was there.
    fn save(&self, key: &str, shapes: &[Shape]) -> StorageResult<()>;

    /// Load the shape list stored under `key`.
    fn load(&self, key: &str) -> StorageResult<Vec<Shape>>;

    /// Forget `key`. Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> StorageResult<()>;

    /// All stored keys, in no particular order.
    fn list(&self) -> StorageResult<Vec<String>>;

    fn exists(&self, key: &str) -> StorageResult<bool>;
}
