//! Key-value storage capability used to persist tokens.

mod encryption;
mod file;
mod memory;

use async_trait::async_trait;

use crate::error::Error;

pub use encryption::ValueCipher;
pub use file::FileStore;
pub use memory::MemoryStore;

/// Opaque namespaced key-value storage.
///
/// Implementations must be safe to share between concurrent tasks. Removing an
/// absent key is not an error.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key` in `namespace`.
    async fn get(&self, namespace: &str, key: &str) -> Result<Option<String>, Error>;

    /// Store `value` under `key` in `namespace`, replacing any previous value.
    async fn set(&self, namespace: &str, key: &str, value: &str) -> Result<(), Error>;

    /// Delete the value stored under `key` in `namespace`.
    async fn remove(&self, namespace: &str, key: &str) -> Result<(), Error>;
}

/// Flattened entry key, `"<namespace>:<key>"`.
pub(crate) fn entry_key(namespace: &str, key: &str) -> String {
    format!("{}:{}", namespace, key)
}
