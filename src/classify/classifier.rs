use serde::Serialize;
use tracing::{debug, warn};

use crate::classify::orphan::is_orphan_path;
use crate::classify::rename::RenameIndex;
use crate::snapshot::SnapshotOracle;
use crate::stream::{Operation, RawCommand};
use crate::types::{Action, ChangeDetails};

/// One classified command: a candidate change at a resolved path, still
/// subject to per-path reconciliation. Multiple actions per path are
/// expected, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionalAction {
    pub path: String,
    pub action: Action,
    pub details: ChangeDetails,
    pub order: u64,
}

/// Diagnostic counters for commands the classifier dropped. Observability
/// only; never consulted for control flow.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClassifyStats {
    /// Commands whose path never resolved away from a synthetic orphan name.
    pub orphan_paths_dropped: u64,
    /// Orphan deletions with no reverse-rename trace to a real name.
    pub untraceable_deletions_dropped: u64,
    /// Deletions of paths that never existed in the old snapshot.
    pub phantom_deletions_dropped: u64,
    /// Renames whose direct destination is a deleted orphan.
    pub renames_into_deleted_dropped: u64,
    /// Renames already represented by a symlink creation at the same path.
    pub symlink_renames_suppressed: u64,
    /// Oracle queries that failed; existence was assumed for each.
    pub oracle_failures: u64,
}

/// Classify the ordered command sequence into provisional per-path actions,
/// consulting the old/new snapshot oracles to filter phantom artifacts.
pub fn classify(
    commands: &[RawCommand],
    old: &dyn SnapshotOracle,
    new: &dyn SnapshotOracle,
) -> (Vec<ProvisionalAction>, ClassifyStats) {
    let index = RenameIndex::build(commands);
    let mut actions = Vec::new();
    let mut stats = ClassifyStats::default();

    for cmd in commands {
        match &cmd.op {
            // Symlinks start life under an orphan name, so resolve through
            // the rename chain before classifying.
            Operation::Symlink { path, inode, target } => {
                let final_path = index.resolve_final(path);
                if is_orphan_path(&final_path) {
                    stats.orphan_paths_dropped += 1;
                    debug!(path = %final_path, "dropped symlink at unresolved orphan path");
                    continue;
                }
                let mut details = ChangeDetails::new(cmd.op.tag(), final_path.clone());
                details.inode = Some(*inode);
                details.path_link = Some(target.clone());

                if exists_or_assume(new, &final_path, &mut stats) {
                    actions.push(ProvisionalAction {
                        path: final_path,
                        action: Action::Modified,
                        details,
                        order: cmd.order,
                    });
                } else if exists_or_assume(old, &final_path, &mut stats) {
                    actions.push(ProvisionalAction {
                        path: final_path,
                        action: Action::Deleted,
                        details,
                        order: cmd.order,
                    });
                } else {
                    stats.phantom_deletions_dropped += 1;
                    debug!(path = %final_path, "skipped phantom symlink deletion");
                }
            }

            Operation::Mkfile { path }
            | Operation::Mkdir { path }
            | Operation::Truncate { path, .. }
            | Operation::UpdateExtent { path, .. } => {
                if is_orphan_path(path) {
                    stats.orphan_paths_dropped += 1;
                    continue;
                }
                if let Some(details) = cmd.op.details() {
                    actions.push(ProvisionalAction {
                        path: path.clone(),
                        action: Action::Modified,
                        details,
                        order: cmd.order,
                    });
                }
            }

            Operation::Unlink { path } | Operation::Rmdir { path } => {
                let effective = if is_orphan_path(path) {
                    let traced = index.trace_original(path);
                    // A trace that comes back unchanged, or lands on yet
                    // another orphan, has no user-visible name to report.
                    if traced == *path || is_orphan_path(&traced) {
                        stats.untraceable_deletions_dropped += 1;
                        debug!(path = %path, "dropped untraceable orphan deletion");
                        continue;
                    }
                    debug!(orphan = %path, traced = %traced, "traced orphan deletion");
                    traced
                } else {
                    path.clone()
                };

                if !exists_or_assume(old, &effective, &mut stats) {
                    stats.phantom_deletions_dropped += 1;
                    debug!(path = %effective, "skipped phantom deletion");
                    continue;
                }

                actions.push(ProvisionalAction {
                    path: effective.clone(),
                    action: Action::Deleted,
                    details: ChangeDetails::new(cmd.op.tag(), effective),
                    order: cmd.order,
                });
            }

            Operation::Rename { path, dest } => {
                if index.is_symlink_source(path) {
                    stats.symlink_renames_suppressed += 1;
                    continue;
                }
                if is_orphan_path(path) {
                    stats.orphan_paths_dropped += 1;
                    continue;
                }
                if index.is_deleted_orphan(dest) {
                    stats.renames_into_deleted_dropped += 1;
                    debug!(path = %path, dest = %dest, "skipped rename into deleted orphan");
                    continue;
                }
                let final_dest = index.resolve_final(path);
                if is_orphan_path(&final_dest) {
                    stats.orphan_paths_dropped += 1;
                    continue;
                }
                let mut details = ChangeDetails::new(cmd.op.tag(), path.clone());
                details.path_to = Some(final_dest);
                actions.push(ProvisionalAction {
                    path: path.clone(),
                    action: Action::Renamed,
                    details,
                    order: cmd.order,
                });
            }

            // No path-visible net effect at this layer.
            Operation::Other(_) => {}
        }
    }

    (actions, stats)
}

/// Fail-safe existence check: an oracle failure counts as "exists" so a
/// real change is never silently dropped.
fn exists_or_assume(oracle: &dyn SnapshotOracle, path: &str, stats: &mut ClassifyStats) -> bool {
    match oracle.exists(path) {
        Ok(found) => found,
        Err(err) => {
            stats.oracle_failures += 1;
            warn!(path = %path, error = %err, "snapshot oracle failed, assuming path exists");
            true
        }
    }
}
