use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::classify::orphan::is_orphan_path;
use crate::stream::{Operation, RawCommand};

/// Lookup structures built in one sequential scan over the command
/// sequence, used by every classification decision that follows.
///
/// The forward map forms a directed graph of rename edges; walks over it are
/// guarded with a per-walk visited set so stream anomalies cannot loop.
#[derive(Debug, Default)]
pub struct RenameIndex {
    forward: HashMap<String, String>,
    reverse: HashMap<String, String>,
    deleted_orphans: HashSet<String>,
    symlink_sources: HashSet<String>,
}

impl RenameIndex {
    pub fn build(commands: &[RawCommand]) -> Self {
        let mut index = Self::default();
        for cmd in commands {
            match &cmd.op {
                Operation::Rename { path, dest } => {
                    index.forward.insert(path.clone(), dest.clone());
                    index.reverse.insert(dest.clone(), path.clone());
                }
                Operation::Unlink { path } | Operation::Rmdir { path } => {
                    if is_orphan_path(path) {
                        index.deleted_orphans.insert(path.clone());
                    }
                }
                Operation::Symlink { path, .. } => {
                    index.symlink_sources.insert(path.clone());
                }
                _ => {}
            }
        }
        index
    }

    /// Whether this orphan path's rename chain terminates in deletion.
    pub fn is_deleted_orphan(&self, path: &str) -> bool {
        self.deleted_orphans.contains(path)
    }

    /// Whether this path is the primary path of a symlink creation.
    pub fn is_symlink_source(&self, path: &str) -> bool {
        self.symlink_sources.contains(path)
    }

    /// Follow rename edges to the path's final name. Stops on a missing
    /// edge, a cycle, or a next hop that is a deleted orphan (resolution
    /// then holds at the last good hop rather than the deleted name).
    pub fn resolve_final(&self, path: &str) -> String {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut current = path;
        while let Some(next) = self.forward.get(current) {
            if !seen.insert(current) {
                break;
            }
            if self.deleted_orphans.contains(next) {
                debug!(stopped_at = %next, "rename resolution stopped at deleted orphan");
                break;
            }
            current = next;
        }
        if current != path {
            debug!(from = %path, to = %current, "resolved rename chain");
        }
        current.to_string()
    }

    /// Trace an orphan path back to the real name it was last known by.
    ///
    /// Returns the input unchanged when no trace exists; callers treat an
    /// unchanged return as "not traceable".
    pub fn trace_original(&self, path: &str) -> String {
        let mut seen = HashSet::new();
        self.trace_guarded(path, &mut seen)
    }

    fn trace_guarded(&self, path: &str, seen: &mut HashSet<String>) -> String {
        if !seen.insert(path.to_string()) {
            return path.to_string();
        }

        if let Some(traced) = self.reverse.get(path) {
            // A traced name that still carries orphan components needs
            // another hop back.
            if is_orphan_path(traced) {
                return self.trace_guarded(traced, seen);
            }
            return traced.clone();
        }

        // No direct entry: an orphan leading component like
        // "o257-106840-0/file.txt" is traced alone, with the remainder
        // spliced back on.
        if let Some((head, rest)) = path.split_once('/')
            && is_orphan_path(head)
        {
            let traced_head = self.trace_guarded(head, seen);
            if traced_head != head {
                return format!("{traced_head}/{rest}");
            }
        }

        path.to_string()
    }
}
