//! Directory-backed key-value store.
//!
//! Keys are `:`-separated paths under the root: `dictionary:epi` lives at
//! `<root>/dictionary/epi`. A TTL is recorded in a sidecar
//! `<file>.expires` holding an RFC 3339 timestamp; values without a sidecar
//! never expire. External processes pre-populate dictionaries by dropping
//! plain JSON files into the tree.
//!
//! Each file is written through a temp file in its directory and renamed
//! into place, so readers never observe a partial value or timestamp. The
//! value and its sidecar are two separate renames: a `get` racing a `put`
//! can pair the new value with the previous expiry. With an already expired
//! previous expiry that read is a miss; it never returns a value past the
//! expiry it was written with.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::StoreError;
use crate::kv::KvStore;

pub struct FileKv {
    root: PathBuf,
}

impl FileKv {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a key to its value file, rejecting anything that could escape the root.
    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let mut path = self.root.clone();
        for segment in key.split(':') {
            let valid = !segment.is_empty()
                && segment != "."
                && segment != ".."
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
            if !valid {
                return Err(StoreError::InvalidKey(key.to_string()));
            }
            path.push(segment);
        }
        Ok(path)
    }
}

fn expiry_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".expires");
    PathBuf::from(name)
}

async fn read_optional(path: &Path) -> Result<Option<Vec<u8>>, StoreError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let dir = path
        .parent()
        .ok_or_else(|| StoreError::Other(format!("no parent directory for {}", path.display())))?;
    std::fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.persist(path).map_err(|e| StoreError::Io(e.error))?;
    Ok(())
}

fn remove_if_present(path: &Path) -> Result<(), StoreError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[async_trait]
impl KvStore for FileKv {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let path = self.path_for(key)?;

        if let Some(raw) = read_optional(&expiry_path(&path)).await? {
            let text = String::from_utf8_lossy(&raw);
            match DateTime::parse_from_rfc3339(text.trim()) {
                Ok(expires_at) if expires_at.with_timezone(&Utc) <= Utc::now() => {
                    debug!(key, "file entry expired");
                    return Ok(None);
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(key, error = %e, "unreadable expiry sidecar, treating entry as expired");
                    return Ok(None);
                }
            }
        }

        read_optional(&path).await
    }

    async fn put(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl: Option<Duration>,
    ) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        let expires_at = match ttl {
            Some(ttl) => {
                let ttl = chrono::Duration::from_std(ttl)
                    .map_err(|e| StoreError::Other(format!("ttl out of range: {e}")))?;
                Some(Utc::now() + ttl)
            }
            None => None,
        };

        tokio::task::spawn_blocking(move || {
            let sidecar = expiry_path(&path);
            write_atomic(&path, &value)?;
            match expires_at {
                Some(at) => write_atomic(&sidecar, at.to_rfc3339().as_bytes()),
                None => remove_if_present(&sidecar),
            }
        })
        .await
        .map_err(|e| StoreError::Other(format!("file write task failed: {e}")))?
    }
}
