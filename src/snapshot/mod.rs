//! Snapshot-content oracle.
//!
//! The classifier never touches the filesystem directly; it asks these
//! read-only queries against the old and new snapshot roots. Snapshots are
//! immutable, so each decision queries once, with no retry or consistency
//! handling.

mod dir;
mod oracle;

pub use dir::DirSnapshot;
pub use oracle::{OracleError, OracleResult, SnapshotOracle};

#[cfg(any(test, feature = "mockall"))]
pub use oracle::MockSnapshotOracle;
