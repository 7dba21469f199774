//! Path classification.
//!
//! Consumes the ordered command sequence and turns it into provisional
//! per-path actions: orphan names are resolved through the rename chain,
//! synthetic artifacts and phantom deletions are dropped, and every kept
//! action carries a rewritten, user-visible path. Dropped commands are not
//! errors; they are counted in [`ClassifyStats`] for observability only.

mod classifier;
mod orphan;
mod rename;

pub use classifier::{ClassifyStats, ProvisionalAction, classify};
pub use orphan::is_orphan_path;
pub use rename::RenameIndex;
