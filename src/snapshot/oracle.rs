use std::path::PathBuf;

#[cfg(any(test, feature = "mockall"))]
use mockall::automock;
use thiserror::Error;

pub type OracleResult<T> = Result<T, OracleError>;

#[derive(Error, Debug)]
pub enum OracleError {
    #[error("snapshot read failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("symlink target for {path} is not valid utf-8")]
    NonUtf8Target { path: PathBuf },
}

/// Read-only queries against one snapshot root.
///
/// Paths are relative to the snapshot root, as they appear in the send
/// stream. Implementations must never write through this interface.
#[cfg_attr(any(test, feature = "mockall"), automock)]
pub trait SnapshotOracle: Send + Sync {
    /// Whether the path exists in the snapshot. Follows symlinks, so a
    /// dangling symlink reports false.
    fn exists(&self, relative_path: &str) -> OracleResult<bool>;

    /// Whether the path is a symlink (without following it).
    fn is_symlink(&self, relative_path: &str) -> OracleResult<bool>;

    /// The target a symlink at the path points to.
    fn symlink_target(&self, relative_path: &str) -> OracleResult<String>;
}
