//! Output data model shared across the pipeline stages.

use serde::Serialize;

use crate::stream::CommandTag;

/// Net-effect classification for a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Deleted,
    Modified,
    Renamed,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Deleted => "deleted",
            Action::Modified => "modified",
            Action::Renamed => "renamed",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flat, serializable mirror of the command that justified a change.
///
/// Fields that do not apply to the command stay `None` and are omitted from
/// serialized output; they are never fabricated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeDetails {
    pub command: CommandTag,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inode: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_offset: Option<u64>,
}

impl ChangeDetails {
    pub fn new(command: CommandTag, path: impl Into<String>) -> Self {
        Self {
            command,
            path: path.into(),
            path_to: None,
            path_link: None,
            size: None,
            inode: None,
            file_offset: None,
        }
    }
}

/// One entry in the final change list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeRecord {
    pub path: String,
    pub action: Action,
    pub details: ChangeDetails,
}
