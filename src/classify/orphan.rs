use std::sync::LazyLock;

use regex::Regex;

/// Matches a synthetic `o<ino>-<gen>-<n>` name as a whole path or as any
/// path component. `btrfs send` assigns these to inodes not yet linked to
/// their final name.
static ORPHAN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^|/)o[0-9]+-[0-9]+-[0-9]+(/|$)").expect("orphan pattern compiles")
});

/// Whether any component of the path is a synthetic orphan name.
pub fn is_orphan_path(path: &str) -> bool {
    ORPHAN_PATTERN.is_match(path)
}
