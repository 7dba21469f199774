//! Pipeline entry point: decode, classify, reconcile.

use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

use crate::classify::{ClassifyStats, classify};
use crate::reconcile::reconcile;
use crate::snapshot::{DirSnapshot, SnapshotOracle};
use crate::stream::{DecodeError, RawCommand, decode_stream};
use crate::types::ChangeRecord;

pub type DiffResult<T> = Result<T, DiffError>;

#[derive(Error, Debug)]
pub enum DiffError {
    #[error("snapshot does not exist: {0}")]
    SnapshotMissing(PathBuf),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// The reconciled change list plus the classifier's diagnostic counters.
/// Recomputed fresh on every invocation; never mutated or persisted.
#[derive(Debug)]
pub struct DiffReport {
    pub changes: Vec<ChangeRecord>,
    pub stats: ClassifyStats,
}

impl DiffReport {
    /// Render the change list as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.changes)
    }
}

/// Extracts the net filesystem changes between two snapshots from a
/// `btrfs send` stream produced against them.
///
/// The caller supplies the raw stream bytes; invoking `btrfs send` itself is
/// a collaborator concern. Invocations are independent and may run
/// concurrently on different inputs.
#[derive(Debug)]
pub struct SnapshotDiff {
    old: DirSnapshot,
    new: DirSnapshot,
}

impl SnapshotDiff {
    /// Both snapshot roots must exist; this is checked up front, before any
    /// decoding happens.
    pub fn new(old_root: impl Into<PathBuf>, new_root: impl Into<PathBuf>) -> DiffResult<Self> {
        let old_root = old_root.into();
        if !old_root.exists() {
            return Err(DiffError::SnapshotMissing(old_root));
        }
        let new_root = new_root.into();
        if !new_root.exists() {
            return Err(DiffError::SnapshotMissing(new_root));
        }
        Ok(Self { old: DirSnapshot::new(old_root), new: DirSnapshot::new(new_root) })
    }

    /// Decode the stream and reconcile it into the final change list.
    pub fn changes(&self, stream: &[u8]) -> DiffResult<DiffReport> {
        let commands = decode_stream(stream)?;
        Ok(extract_changes(&commands, &self.old, &self.new))
    }
}

/// Oracle-generic core of the pipeline: classification and reconciliation
/// over an already-decoded command sequence.
pub fn extract_changes(
    commands: &[RawCommand],
    old: &dyn SnapshotOracle,
    new: &dyn SnapshotOracle,
) -> DiffReport {
    let (actions, stats) = classify(commands, old, new);
    let changes = reconcile(actions);
    debug!(
        commands = commands.len(),
        changes = changes.len(),
        oracle_failures = stats.oracle_failures,
        "extracted snapshot changes"
    );
    DiffReport { changes, stats }
}
