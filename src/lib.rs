//! snapdiff — structured change extraction between btrfs snapshots.
//!
//! Decodes the binary stream produced by `btrfs send` against two snapshots
//! and reconciles the raw low-level operations it contains into one net
//! effect per path: synthetic orphan names are resolved or dropped, rename
//! chains are collapsed, phantom deletions are filtered against the old
//! snapshot, and conflicting multi-operation histories collapse under
//! deterministic tie-break rules.
//!
//! ```no_run
//! use snapdiff::SnapshotDiff;
//!
//! # fn main() -> anyhow::Result<()> {
//! let stream: Vec<u8> = std::fs::read("send.stream")?;
//! let diff = SnapshotDiff::new("/snapshots/old", "/snapshots/new")?;
//! let report = diff.changes(&stream)?;
//! println!("{}", report.to_json()?);
//! # Ok(())
//! # }
//! ```

pub mod classify;
pub mod diff;
pub mod reconcile;
pub mod snapshot;
pub mod stream;
pub mod types;

pub use classify::{ClassifyStats, ProvisionalAction, classify, is_orphan_path};
pub use diff::{DiffError, DiffReport, DiffResult, SnapshotDiff, extract_changes};
pub use reconcile::reconcile;
pub use snapshot::{DirSnapshot, OracleError, OracleResult, SnapshotOracle};
pub use stream::{
    CommandTag, DecodeError, DecodeResult, Operation, RawCommand, STREAM_MAGIC, StreamDecoder,
    decode_stream,
};
pub use types::{Action, ChangeDetails, ChangeRecord};
