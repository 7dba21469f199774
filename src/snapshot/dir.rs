use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::snapshot::oracle::{OracleError, OracleResult, SnapshotOracle};

/// Oracle backed by a snapshot directory on disk.
#[derive(Debug, Clone)]
pub struct DirSnapshot {
    root: PathBuf,
}

impl DirSnapshot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn full_path(&self, relative_path: &str) -> PathBuf {
        self.root.join(relative_path.trim_start_matches('/'))
    }
}

impl SnapshotOracle for DirSnapshot {
    fn exists(&self, relative_path: &str) -> OracleResult<bool> {
        let path = self.full_path(relative_path);
        match fs::metadata(&path) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(source) => Err(OracleError::Io { path, source }),
        }
    }

    fn is_symlink(&self, relative_path: &str) -> OracleResult<bool> {
        let path = self.full_path(relative_path);
        match fs::symlink_metadata(&path) {
            Ok(meta) => Ok(meta.file_type().is_symlink()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(source) => Err(OracleError::Io { path, source }),
        }
    }

    fn symlink_target(&self, relative_path: &str) -> OracleResult<String> {
        let path = self.full_path(relative_path);
        let target = fs::read_link(&path).map_err(|source| OracleError::Io {
            path: path.clone(),
            source,
        })?;
        target
            .into_os_string()
            .into_string()
            .map_err(|_| OracleError::NonUtf8Target { path })
    }
}
