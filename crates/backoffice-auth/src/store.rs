//! Storage backends for the cached auth payload.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::error::{AuthError, AuthResult};

/// Key/value storage for serialized payloads.
pub trait PayloadStore: Send + Sync {
    fn load(&self, key: &str) -> AuthResult<Option<String>>;
    fn save(&self, key: &str, raw: &str) -> AuthResult<()>;
    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> AuthResult<()>;
}

impl<S: PayloadStore + ?Sized> PayloadStore for Arc<S> {
    fn load(&self, key: &str) -> AuthResult<Option<String>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, raw: &str) -> AuthResult<()> {
        (**self).save(key, raw)
    }

    fn remove(&self, key: &str) -> AuthResult<()> {
        (**self).remove(key)
    }
}

/// Process-local store; contents die with the process.
#[derive(Debug, Default)]
pub struct MemoryPayloadStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryPayloadStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PayloadStore for MemoryPayloadStore {
    fn load(&self, key: &str) -> AuthResult<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn save(&self, key: &str, raw: &str) -> AuthResult<()> {
        self.entries.write().insert(key.to_owned(), raw.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> AuthResult<()> {
        self.entries.write().remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FilePayloadStore {
    dir: PathBuf,
}

impl FilePayloadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> AuthResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(AuthError::Storage(format!("invalid storage key {key:?}")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl PayloadStore for FilePayloadStore {
    fn load(&self, key: &str) -> AuthResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no cached payload");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, key: &str, raw: &str) -> AuthResult<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;
        // Atomic replace: readers never observe a partial write.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, raw)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> AuthResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
