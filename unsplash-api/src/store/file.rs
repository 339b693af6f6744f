//! JSON file backend.

use std::collections::BTreeMap;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use super::{entry_key, KeyValueStore, ValueCipher};
use crate::error::{storage_error, Error, StorageErrorKind};

type Entries = BTreeMap<String, String>;

/// Stores entries in a single JSON object file, `{"<namespace>:<key>": value}`.
///
/// When built with a cipher every value is sealed before it is written and opened
/// after it is read. A missing file reads as an empty store.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    cipher: Option<ValueCipher>,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileStore {
    /// Plain-text file store at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cipher: None,
            lock: Mutex::new(()),
        }
    }

    /// File store whose values are encrypted with the hex-encoded 32-byte key.
    pub fn encrypted(path: impl Into<PathBuf>, key_hex: &str) -> Result<Self, Error> {
        Ok(Self {
            path: path.into(),
            cipher: Some(ValueCipher::from_hex(key_hex)?),
            lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_entries(&self) -> Result<Entries, Error> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(Entries::new()),
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| storage_error(StorageErrorKind::Serialization, e)),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(Entries::new()),
            Err(e) => Err(storage_error(StorageErrorKind::Io, e)),
        }
    }

    async fn write_entries(&self, entries: &Entries) -> Result<(), Error> {
        let bytes = serde_json::to_vec_pretty(entries)
            .map_err(|e| storage_error(StorageErrorKind::Serialization, e))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| storage_error(StorageErrorKind::Io, e))?;
            }
        }

        tokio::fs::write(&self.path, bytes)
            .await
            .map_err(|e| storage_error(StorageErrorKind::Io, e))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, namespace: &str, key: &str) -> Result<Option<String>, Error> {
        let _guard = self.lock.lock().await;
        let entries = self.read_entries().await?;

        match (entries.get(&entry_key(namespace, key)), &self.cipher) {
            (Some(value), Some(cipher)) => cipher.open(value).map(Some),
            (Some(value), None) => Ok(Some(value.clone())),
            (None, _) => Ok(None),
        }
    }

    async fn set(&self, namespace: &str, key: &str, value: &str) -> Result<(), Error> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await?;

        let stored = match &self.cipher {
            Some(cipher) => cipher.seal(value)?,
            None => value.to_string(),
        };
        entries.insert(entry_key(namespace, key), stored);

        debug!("Writing entry {}:{} to {}", namespace, key, self.path.display());
        self.write_entries(&entries).await
    }

    async fn remove(&self, namespace: &str, key: &str) -> Result<(), Error> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await?;

        if entries.remove(&entry_key(namespace, key)).is_some() {
            self.write_entries(&entries).await?;
        }
        Ok(())
    }
}
