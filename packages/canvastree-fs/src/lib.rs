#![forbid(unsafe_code)]
//! File-backed [`DocumentStore`]: one JSON document per store, overwritten
//! wholesale on every save. The durable analog of the single storage slot
//! browser hosts keep under a fixed key.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use canvastree_core::{ComponentNode, DocumentStore, Error, Result};

/// Default file name for the saved document.
pub const DEFAULT_FILE: &str = "saved-ui.json";

/// Stores the document as pretty-printed JSON at a fixed path.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Store under `dir` with the default file name.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(DEFAULT_FILE),
        }
    }

    /// Store at an explicit file path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist_err(err: impl std::fmt::Display) -> Error {
        Error::Persistence(err.to_string())
    }
}

impl DocumentStore for FileStore {
    fn save(&mut self, nodes: &[ComponentNode]) -> Result<()> {
        let json = serde_json::to_vec_pretty(nodes).map_err(Self::persist_err)?;
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir).map_err(Self::persist_err)?;
            }
        }
        // write-then-rename so a crash mid-write never truncates the save
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &json).map_err(Self::persist_err)?;
        fs::rename(&tmp, &self.path).map_err(Self::persist_err)?;
        Ok(())
    }

    fn load(&self) -> Result<Option<Vec<ComponentNode>>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(Self::persist_err(err)),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(Self::persist_err)
    }
}
