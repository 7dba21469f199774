//! Typed command model for the send stream.
//!
//! The wire format carries loosely-typed attribute bags; decoding pins each
//! command down to a closed variant carrying only its relevant typed fields,
//! so a missing attribute is a decode error rather than a downstream surprise.

use serde::{Serialize, Serializer};

use crate::types::ChangeDetails;

/// Command tags defined by the send-stream format (btrfs/send.h order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandTag {
    Unspec,
    Subvol,
    Snapshot,
    Mkfile,
    Mkdir,
    Mknod,
    Mkfifo,
    Mksock,
    Symlink,
    Rename,
    Link,
    Unlink,
    Rmdir,
    SetXattr,
    RemoveXattr,
    Write,
    Clone,
    Truncate,
    Chmod,
    Chown,
    Utimes,
    End,
    UpdateExtent,
}

impl CommandTag {
    /// Map a wire-format command index to its tag. `None` for indices past
    /// the closed set.
    pub fn from_raw(raw: u16) -> Option<Self> {
        let tag = match raw {
            0 => CommandTag::Unspec,
            1 => CommandTag::Subvol,
            2 => CommandTag::Snapshot,
            3 => CommandTag::Mkfile,
            4 => CommandTag::Mkdir,
            5 => CommandTag::Mknod,
            6 => CommandTag::Mkfifo,
            7 => CommandTag::Mksock,
            8 => CommandTag::Symlink,
            9 => CommandTag::Rename,
            10 => CommandTag::Link,
            11 => CommandTag::Unlink,
            12 => CommandTag::Rmdir,
            13 => CommandTag::SetXattr,
            14 => CommandTag::RemoveXattr,
            15 => CommandTag::Write,
            16 => CommandTag::Clone,
            17 => CommandTag::Truncate,
            18 => CommandTag::Chmod,
            19 => CommandTag::Chown,
            20 => CommandTag::Utimes,
            21 => CommandTag::End,
            22 => CommandTag::UpdateExtent,
            _ => return None,
        };
        Some(tag)
    }

    /// Short name as it appears in serialized output.
    pub fn name(&self) -> &'static str {
        match self {
            CommandTag::Unspec => "unspec",
            CommandTag::Subvol => "subvol",
            CommandTag::Snapshot => "snapshot",
            CommandTag::Mkfile => "mkfile",
            CommandTag::Mkdir => "mkdir",
            CommandTag::Mknod => "mknod",
            CommandTag::Mkfifo => "mkfifo",
            CommandTag::Mksock => "mksock",
            CommandTag::Symlink => "symlink",
            CommandTag::Rename => "rename",
            CommandTag::Link => "link",
            CommandTag::Unlink => "unlink",
            CommandTag::Rmdir => "rmdir",
            CommandTag::SetXattr => "set_xattr",
            CommandTag::RemoveXattr => "remove_xattr",
            CommandTag::Write => "write",
            CommandTag::Clone => "clone",
            CommandTag::Truncate => "truncate",
            CommandTag::Chmod => "chmod",
            CommandTag::Chown => "chown",
            CommandTag::Utimes => "utimes",
            CommandTag::End => "end",
            CommandTag::UpdateExtent => "update_extent",
        }
    }
}

impl std::fmt::Display for CommandTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for CommandTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// One decoded operation with its typed attributes.
///
/// Tags the classifier never consults are decoded as [`Operation::Other`]:
/// their payload is consumed so stream offsets and ordering stay correct,
/// but no attributes are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Mkfile { path: String },
    Mkdir { path: String },
    Symlink { path: String, inode: u64, target: String },
    Rename { path: String, dest: String },
    Unlink { path: String },
    Rmdir { path: String },
    Truncate { path: String, size: u64 },
    UpdateExtent { path: String, file_offset: u64, size: u64 },
    Other(CommandTag),
}

impl Operation {
    pub fn tag(&self) -> CommandTag {
        match self {
            Operation::Mkfile { .. } => CommandTag::Mkfile,
            Operation::Mkdir { .. } => CommandTag::Mkdir,
            Operation::Symlink { .. } => CommandTag::Symlink,
            Operation::Rename { .. } => CommandTag::Rename,
            Operation::Unlink { .. } => CommandTag::Unlink,
            Operation::Rmdir { .. } => CommandTag::Rmdir,
            Operation::Truncate { .. } => CommandTag::Truncate,
            Operation::UpdateExtent { .. } => CommandTag::UpdateExtent,
            Operation::Other(tag) => *tag,
        }
    }

    /// Primary path of the operation, if it carries one.
    pub fn primary_path(&self) -> Option<&str> {
        match self {
            Operation::Mkfile { path }
            | Operation::Mkdir { path }
            | Operation::Symlink { path, .. }
            | Operation::Rename { path, .. }
            | Operation::Unlink { path }
            | Operation::Rmdir { path }
            | Operation::Truncate { path, .. }
            | Operation::UpdateExtent { path, .. } => Some(path),
            Operation::Other(_) => None,
        }
    }

    /// Faithful [`ChangeDetails`] mirror of this operation, or `None` for
    /// tag-only commands that can never justify a change record.
    pub fn details(&self) -> Option<ChangeDetails> {
        let mut details = ChangeDetails::new(self.tag(), self.primary_path()?);
        match self {
            Operation::Symlink { inode, target, .. } => {
                details.inode = Some(*inode);
                details.path_link = Some(target.clone());
            }
            Operation::Rename { dest, .. } => {
                details.path_to = Some(dest.clone());
            }
            Operation::Truncate { size, .. } => {
                details.size = Some(*size);
            }
            Operation::UpdateExtent { file_offset, size, .. } => {
                details.file_offset = Some(*file_offset);
                details.size = Some(*size);
            }
            _ => {}
        }
        Some(details)
    }
}

/// One decoded command with its position in the stream.
///
/// `order` is zero-based and monotonically increasing; it is the only
/// tie-break authority downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCommand {
    pub order: u64,
    pub op: Operation,
}
