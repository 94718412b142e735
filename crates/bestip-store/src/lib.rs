//! Key-value stores holding the dataset blobs
//!
//! The prober publishes four values, one per key:
//! - [`keys::IPV4`] / [`keys::IPV6`] - `&`/`,` delimited measurement rows
//! - [`keys::IPV4_TIME`] / [`keys::IPV6_TIME`] - when each list was refreshed
//!
//! The request path only reads. Two backends are provided:
//! - [`MemoryStore`]: in-process map, seeded by the embedder or tests
//! - [`FileStore`]: one file per key in a directory
//!
//! # Examples
//!
//! ```
//! use bestip_store::{keys, KvStore, MemoryStore};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = MemoryStore::new();
//! store.set(keys::IPV4, "104.16.0.1,4,4,0,12,30").await;
//!
//! assert!(store.get(keys::IPV4).await?.is_some());
//! assert!(store.get(keys::IPV6).await?.is_none());
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::RwLock;

/// Well-known dataset keys
pub mod keys {
    /// IPv4 measurement rows
    pub const IPV4: &str = "ipv4";
    /// IPv6 measurement rows
    pub const IPV6: &str = "ipv6";
    /// IPv4 refresh timestamp
    pub const IPV4_TIME: &str = "ipv4time";
    /// IPv6 refresh timestamp
    pub const IPV6_TIME: &str = "ipv6time";
}

/// Store errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// Key cannot be mapped onto the backend
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Backend read failed
    #[error("Failed to read {key}: {source}")]
    Read {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Read access to dataset blobs
///
/// An absent key is `Ok(None)`, never an error.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Fetch the value stored under `key`
    async fn get(&self, key: &str) -> Result<Option<String>>;
}

/// In-memory store
///
/// Thread-safe with RwLock; writes are only for seeding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated from key/value pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: RwLock::new(
                pairs
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Store a value
    pub async fn set(&self, key: &str, value: impl Into<String>) {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.into());
    }

    /// Remove a value
    pub async fn remove(&self, key: &str) -> Option<String> {
        self.entries.write().await.remove(key)
    }

    /// Number of stored keys
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Check if the store holds no keys
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }
}

/// Directory-backed store
///
/// Each key is a file of the same name directly under the root directory,
/// e.g. `<root>/ipv4`. A missing file is an absent key. Trailing line
/// breaks are not part of the value.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `root`
    ///
    /// The directory is not required to exist yet; every key simply reads as
    /// absent until it does.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let plain = !key.is_empty()
            && key != "."
            && key != ".."
            && !key.contains(['/', '\\', '\0']);
        if !plain {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl KvStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;

        match tokio::fs::read_to_string(&path).await {
            Ok(mut value) => {
                let len = value.trim_end_matches(['\r', '\n']).len();
                value.truncate(len);
                tracing::debug!(key, bytes = value.len(), "read dataset");
                Ok(Some(value))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(key, path = %path.display(), "dataset absent");
                Ok(None)
            }
            Err(source) => Err(StoreError::Read {
                key: key.to_string(),
                source,
            }),
        }
    }
}
