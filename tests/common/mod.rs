//! Wire-format send-stream builder for integration tests.
#![allow(dead_code)]

use snapdiff::STREAM_MAGIC;

pub const CMD_MKFILE: u16 = 3;
pub const CMD_MKDIR: u16 = 4;
pub const CMD_SYMLINK: u16 = 8;
pub const CMD_RENAME: u16 = 9;
pub const CMD_UNLINK: u16 = 11;
pub const CMD_RMDIR: u16 = 12;
pub const CMD_CHMOD: u16 = 18;
pub const CMD_UTIMES: u16 = 20;
pub const CMD_END: u16 = 21;
pub const CMD_TRUNCATE: u16 = 17;
pub const CMD_UPDATE_EXTENT: u16 = 22;

pub const ATTR_INO: u16 = 3;
pub const ATTR_SIZE: u16 = 4;
pub const ATTR_PATH: u16 = 15;
pub const ATTR_PATH_TO: u16 = 16;
pub const ATTR_PATH_LINK: u16 = 17;
pub const ATTR_FILE_OFFSET: u16 = 18;

/// Builds byte buffers in the real send-stream layout.
pub struct StreamBuilder {
    buf: Vec<u8>,
}

impl StreamBuilder {
    pub fn new() -> Self {
        let mut buf = Vec::new();
        buf.extend_from_slice(STREAM_MAGIC);
        buf.push(0);
        buf.extend_from_slice(&1u32.to_le_bytes());
        Self { buf }
    }

    pub fn command(mut self, tag: u16, payload: &[u8]) -> Self {
        self.buf.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        self.buf.extend_from_slice(&tag.to_le_bytes());
        self.buf.extend_from_slice(&0u32.to_le_bytes());
        self.buf.extend_from_slice(payload);
        self
    }

    pub fn mkfile(self, path: &str) -> Self {
        let payload = string_attr(ATTR_PATH, path);
        self.command(CMD_MKFILE, &payload)
    }

    pub fn mkdir(self, path: &str) -> Self {
        let payload = string_attr(ATTR_PATH, path);
        self.command(CMD_MKDIR, &payload)
    }

    pub fn unlink(self, path: &str) -> Self {
        let payload = string_attr(ATTR_PATH, path);
        self.command(CMD_UNLINK, &payload)
    }

    pub fn rmdir(self, path: &str) -> Self {
        let payload = string_attr(ATTR_PATH, path);
        self.command(CMD_RMDIR, &payload)
    }

    pub fn rename(self, path: &str, dest: &str) -> Self {
        let mut payload = string_attr(ATTR_PATH, path);
        payload.extend_from_slice(&string_attr(ATTR_PATH_TO, dest));
        self.command(CMD_RENAME, &payload)
    }

    pub fn symlink(self, path: &str, inode: u64, target: &str) -> Self {
        let mut payload = string_attr(ATTR_PATH, path);
        payload.extend_from_slice(&u64_attr(ATTR_INO, inode));
        payload.extend_from_slice(&string_attr(ATTR_PATH_LINK, target));
        self.command(CMD_SYMLINK, &payload)
    }

    pub fn truncate(self, path: &str, size: u64) -> Self {
        let mut payload = string_attr(ATTR_PATH, path);
        payload.extend_from_slice(&u64_attr(ATTR_SIZE, size));
        self.command(CMD_TRUNCATE, &payload)
    }

    pub fn update_extent(self, path: &str, file_offset: u64, size: u64) -> Self {
        let mut payload = string_attr(ATTR_PATH, path);
        payload.extend_from_slice(&u64_attr(ATTR_FILE_OFFSET, file_offset));
        payload.extend_from_slice(&u64_attr(ATTR_SIZE, size));
        self.command(CMD_UPDATE_EXTENT, &payload)
    }

    /// Append the end command and return the finished buffer.
    pub fn finish(self) -> Vec<u8> {
        self.command(CMD_END, &[]).buf
    }

    /// Return the buffer without an end command (a truncated stream).
    pub fn finish_without_end(self) -> Vec<u8> {
        self.buf
    }
}

pub fn string_attr(tag: u16, value: &str) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&tag.to_le_bytes());
    out.extend_from_slice(&(value.len() as u16).to_le_bytes());
    out.extend_from_slice(value.as_bytes());
    out
}

pub fn u64_attr(tag: u16, value: u64) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&tag.to_le_bytes());
    out.extend_from_slice(&8u16.to_le_bytes());
    out.extend_from_slice(&value.to_le_bytes());
    out
}
