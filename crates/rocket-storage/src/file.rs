//! File-backed store, one file per key.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use tracing::debug;

use crate::{StorageError, Store};

const VALUE_EXTENSION: &str = "kv";

/// Store that keeps each key in its own file under `<root>/<scope>/`.
///
/// File names are the URL-safe base64 of the key, so any key string is
/// accepted. Writes go to a temporary file that is renamed over the old
/// value.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) the scope directory under `root`.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let store = FileStore::open(".rocket", "default")?;
    /// ```
    pub fn open(root: impl AsRef<Path>, scope: &str) -> Result<Self, StorageError> {
        if scope.is_empty()
            || scope == "."
            || scope == ".."
            || scope.contains(['/', '\\'])
        {
            return Err(StorageError::InvalidScope(scope.to_string()));
        }

        let dir = root.as_ref().join(scope);
        fs::create_dir_all(&dir).map_err(|e| {
            StorageError::OpenError(format!("{}: {}", dir.display(), e))
        })?;

        debug!(dir = %dir.display(), "opened file store");
        Ok(Self { dir })
    }

    /// Directory holding this scope's values.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}", URL_SAFE_NO_PAD.encode(key), VALUE_EXTENSION))
    }
}

impl Store for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let path = self.path_for(key);
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn exists(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.path_for(key).is_file())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().map_or(true, |e| e != VALUE_EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            // Foreign files in the directory are skipped
            if let Ok(raw) = URL_SAFE_NO_PAD.decode(stem) {
                if let Ok(key) = String::from_utf8(raw) {
                    keys.push(key);
                }
            }
        }
        keys.sort();
        Ok(keys)
    }
}
