//! Per-path conflict reconciliation.
//!
//! Groups provisional actions by their final path and collapses each group
//! to the net user-visible effect. Tie-breaks, first match wins:
//!
//! 1. rmdir deletion + symlink modification at the same path: both are real
//!    independent effects, report both.
//! 2. a deletion plus any modification/rename: the latest modify/rename
//!    wins, the intermediate deletion is invisible.
//! 3. rename plus modify (no deletion): the rename wins, structure
//!    dominates content.
//! 4. otherwise: last writer wins by stream order.
//!
//! Output is sorted by `(action, path)` so it is deterministic and
//! independent of grouping traversal order.

use std::collections::HashMap;

use tracing::debug;

use crate::classify::ProvisionalAction;
use crate::stream::CommandTag;
use crate::types::{Action, ChangeRecord};

pub fn reconcile(actions: Vec<ProvisionalAction>) -> Vec<ChangeRecord> {
    let mut by_path: HashMap<String, Vec<ProvisionalAction>> = HashMap::new();
    for action in actions {
        by_path.entry(action.path.clone()).or_default().push(action);
    }

    let mut changes = Vec::new();
    for (path, group) in by_path {
        resolve_group(&path, group, &mut changes);
    }

    changes.sort_by(|a, b| {
        (a.action.as_str(), a.path.as_str()).cmp(&(b.action.as_str(), b.path.as_str()))
    });
    changes
}

fn resolve_group(path: &str, group: Vec<ProvisionalAction>, out: &mut Vec<ChangeRecord>) {
    if group.len() == 1 {
        if let Some(single) = group.into_iter().next() {
            out.push(into_record(single));
        }
        return;
    }

    let has_delete = group.iter().any(|a| a.action == Action::Deleted);
    let has_modify = group.iter().any(|a| a.action == Action::Modified);
    let has_rename = group.iter().any(|a| a.action == Action::Renamed);

    if has_delete && (has_modify || has_rename) {
        // Directory replaced by a symlink: the rmdir and the symlink are
        // both user-visible, emit the pair.
        let rmdir = group
            .iter()
            .find(|a| a.action == Action::Deleted && a.details.command == CommandTag::Rmdir);
        let symlink = group
            .iter()
            .find(|a| a.action == Action::Modified && a.details.command == CommandTag::Symlink);
        if let (Some(rmdir), Some(symlink)) = (rmdir, symlink) {
            debug!(path = %path, "rmdir+symlink at same path, reporting both");
            out.push(into_record(rmdir.clone()));
            out.push(into_record(symlink.clone()));
            return;
        }

        // Delete then recreate: the path ends up modified/renamed, the
        // intermediate deletion never shows.
        let last = group
            .iter()
            .filter(|a| matches!(a.action, Action::Modified | Action::Renamed))
            .max_by_key(|a| a.order);
        if let Some(last) = last {
            debug!(path = %path, action = %last.action, "delete+recreate collapsed");
            out.push(into_record(last.clone()));
        }
        return;
    }

    if has_rename && has_modify {
        let renamed = group.iter().filter(|a| a.action == Action::Renamed).min_by_key(|a| a.order);
        if let Some(renamed) = renamed {
            debug!(path = %path, "rename+modify collapsed to rename");
            out.push(into_record(renamed.clone()));
        }
        return;
    }

    if let Some(last) = group.into_iter().max_by_key(|a| a.order) {
        out.push(into_record(last));
    }
}

fn into_record(action: ProvisionalAction) -> ChangeRecord {
    ChangeRecord { path: action.path, action: action.action, details: action.details }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChangeDetails;

    fn action(path: &str, action: Action, tag: CommandTag, order: u64) -> ProvisionalAction {
        ProvisionalAction {
            path: path.to_string(),
            action,
            details: ChangeDetails::new(tag, path),
            order,
        }
    }

    #[test]
    fn test_empty_input_empty_output() {
        assert!(reconcile(Vec::new()).is_empty());
    }

    #[test]
    fn test_singleton_group_emitted_verbatim() {
        let changes = reconcile(vec![action("a", Action::Modified, CommandTag::Mkfile, 0)]);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].path, "a");
        assert_eq!(changes[0].action, Action::Modified);
    }

    #[test]
    fn test_rmdir_plus_symlink_dual_report() {
        let changes = reconcile(vec![
            action("p", Action::Deleted, CommandTag::Rmdir, 0),
            action("p", Action::Modified, CommandTag::Symlink, 1),
        ]);
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].action, Action::Deleted);
        assert_eq!(changes[0].details.command, CommandTag::Rmdir);
        assert_eq!(changes[1].action, Action::Modified);
        assert_eq!(changes[1].details.command, CommandTag::Symlink);
    }

    #[test]
    fn test_delete_then_recreate_collapses_to_modify() {
        let changes = reconcile(vec![
            action("p", Action::Deleted, CommandTag::Unlink, 0),
            action("p", Action::Modified, CommandTag::Mkfile, 1),
        ]);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].action, Action::Modified);
        assert_eq!(changes[0].details.command, CommandTag::Mkfile);
    }

    #[test]
    fn test_delete_recreate_uses_latest_modify() {
        let changes = reconcile(vec![
            action("p", Action::Modified, CommandTag::Mkfile, 0),
            action("p", Action::Deleted, CommandTag::Unlink, 1),
            action("p", Action::Modified, CommandTag::Truncate, 2),
        ]);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].details.command, CommandTag::Truncate);
    }

    #[test]
    fn test_unlink_plus_symlink_is_not_dual_reported() {
        // rule 1 is specifically rmdir + symlink; unlink falls through to
        // delete+recreate
        let changes = reconcile(vec![
            action("p", Action::Deleted, CommandTag::Unlink, 0),
            action("p", Action::Modified, CommandTag::Symlink, 1),
        ]);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].action, Action::Modified);
    }

    #[test]
    fn test_rename_beats_modify() {
        let changes = reconcile(vec![
            action("p", Action::Modified, CommandTag::Truncate, 0),
            action("p", Action::Renamed, CommandTag::Rename, 1),
        ]);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].action, Action::Renamed);
    }

    #[test]
    fn test_rename_beats_modify_regardless_of_order() {
        let changes = reconcile(vec![
            action("p", Action::Renamed, CommandTag::Rename, 0),
            action("p", Action::Modified, CommandTag::Truncate, 1),
        ]);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].action, Action::Renamed);
    }

    #[test]
    fn test_fallback_last_writer_wins() {
        let changes = reconcile(vec![
            action("p", Action::Modified, CommandTag::Mkfile, 3),
            action("p", Action::Modified, CommandTag::Truncate, 7),
        ]);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].details.command, CommandTag::Truncate);
    }

    #[test]
    fn test_output_sorted_by_action_then_path() {
        let changes = reconcile(vec![
            action("z", Action::Deleted, CommandTag::Unlink, 0),
            action("a", Action::Renamed, CommandTag::Rename, 1),
            action("m", Action::Modified, CommandTag::Mkfile, 2),
            action("b", Action::Deleted, CommandTag::Unlink, 3),
        ]);
        let keys: Vec<(&str, &str)> =
            changes.iter().map(|c| (c.action.as_str(), c.path.as_str())).collect();
        assert_eq!(
            keys,
            vec![("deleted", "b"), ("deleted", "z"), ("modified", "m"), ("renamed", "a")]
        );
    }

    #[test]
    fn test_groups_are_independent() {
        let changes = reconcile(vec![
            action("p", Action::Deleted, CommandTag::Unlink, 0),
            action("q", Action::Modified, CommandTag::Mkfile, 1),
        ]);
        assert_eq!(changes.len(), 2);
    }
}
