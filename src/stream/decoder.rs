//! Send-stream wire format decoder.
//!
//! Layout: a 17-byte stream header (12-byte magic, NUL, little-endian u32
//! version), then a sequence of records. Each record is a 10-byte header
//! (u32 payload length, u16 command tag, u32 crc) followed by the payload:
//! attribute TLVs with a 4-byte header (u16 type tag, u16 length) each.
//! The record advance always uses the header-declared payload length, so
//! commands whose attributes are not decoded still keep offsets correct.

use tracing::debug;

use crate::stream::command::{CommandTag, Operation, RawCommand};
use crate::stream::error::{DecodeError, DecodeResult};

pub const STREAM_MAGIC: &[u8; 12] = b"btrfs-stream";

const STREAM_HEADER_LEN: usize = 17;
const CMD_HEADER_LEN: usize = 10;
const TLV_HEADER_LEN: usize = 4;

/// Attribute type tags defined by the send-stream format (btrfs/send.h order).
mod attr {
    pub const INO: u16 = 3;
    pub const SIZE: u16 = 4;
    pub const PATH: u16 = 15;
    pub const PATH_TO: u16 = 16;
    pub const PATH_LINK: u16 = 17;
    pub const FILE_OFFSET: u16 = 18;

    const NAMES: [&str; 25] = [
        "unspec",
        "uuid",
        "ctransid",
        "ino",
        "size",
        "mode",
        "uid",
        "gid",
        "rdev",
        "ctime",
        "mtime",
        "atime",
        "otime",
        "xattr_name",
        "xattr_data",
        "path",
        "path_to",
        "path_link",
        "file_offset",
        "data",
        "clone_uuid",
        "clone_ctransid",
        "clone_path",
        "clone_offset",
        "clone_len",
    ];

    pub fn name(tag: u16) -> &'static str {
        NAMES.get(tag as usize).copied().unwrap_or("unknown")
    }
}

/// Decode a whole send stream into its ordered command sequence.
pub fn decode_stream(buf: &[u8]) -> DecodeResult<Vec<RawCommand>> {
    StreamDecoder::new(buf)?.decode()
}

/// Pure decoder over a fully resident byte buffer. Performs no I/O.
pub struct StreamDecoder<'a> {
    buf: &'a [u8],
    version: u32,
}

impl<'a> StreamDecoder<'a> {
    /// Validate the stream header. Fails on short buffers and magic
    /// mismatches before any record is touched.
    pub fn new(buf: &'a [u8]) -> DecodeResult<Self> {
        if buf.len() < STREAM_HEADER_LEN {
            return Err(DecodeError::ShortHeader(buf.len()));
        }
        if &buf[..STREAM_MAGIC.len()] != STREAM_MAGIC {
            return Err(DecodeError::BadMagic);
        }
        let version = read_u32(buf, STREAM_MAGIC.len() + 1);
        Ok(Self { buf, version })
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Decode records until the end command. The end command itself is not
    /// emitted; reaching the end of the buffer without one is a truncation.
    pub fn decode(&self) -> DecodeResult<Vec<RawCommand>> {
        let mut commands = Vec::new();
        let mut offset = STREAM_HEADER_LEN;
        let mut order = 0u64;

        loop {
            if self.buf.len() - offset < CMD_HEADER_LEN {
                return Err(DecodeError::Truncated { offset });
            }
            let payload_len = read_u32(self.buf, offset) as usize;
            let raw_tag = read_u16(self.buf, offset + 4);
            let tag = CommandTag::from_raw(raw_tag)
                .ok_or(DecodeError::UnknownCommand { offset, tag: raw_tag })?;

            let payload_start = offset + CMD_HEADER_LEN;
            if payload_len > self.buf.len() - payload_start {
                return Err(DecodeError::Truncated { offset });
            }
            let payload_end = payload_start + payload_len;

            if tag == CommandTag::End {
                break;
            }

            let payload = &self.buf[payload_start..payload_end];
            let op = decode_operation(tag, payload, payload_start)?;
            commands.push(RawCommand { order, op });

            order += 1;
            offset = payload_end;
        }

        debug!(version = self.version, commands = commands.len(), "decoded send stream");
        Ok(commands)
    }
}

fn decode_operation(tag: CommandTag, payload: &[u8], base: usize) -> DecodeResult<Operation> {
    let mut attrs = AttrCursor::new(payload, base);
    let op = match tag {
        CommandTag::Mkfile => Operation::Mkfile { path: attrs.string(attr::PATH)? },
        CommandTag::Mkdir => Operation::Mkdir { path: attrs.string(attr::PATH)? },
        CommandTag::Unlink => Operation::Unlink { path: attrs.string(attr::PATH)? },
        CommandTag::Rmdir => Operation::Rmdir { path: attrs.string(attr::PATH)? },
        CommandTag::Rename => {
            let path = attrs.string(attr::PATH)?;
            let dest = attrs.string(attr::PATH_TO)?;
            Operation::Rename { path, dest }
        }
        CommandTag::Symlink => {
            let path = attrs.string(attr::PATH)?;
            let inode = attrs.u64(attr::INO)?;
            let target = attrs.string(attr::PATH_LINK)?;
            Operation::Symlink { path, inode, target }
        }
        CommandTag::Truncate => {
            let path = attrs.string(attr::PATH)?;
            let size = attrs.u64(attr::SIZE)?;
            Operation::Truncate { path, size }
        }
        CommandTag::UpdateExtent => {
            let path = attrs.string(attr::PATH)?;
            let file_offset = attrs.u64(attr::FILE_OFFSET)?;
            let size = attrs.u64(attr::SIZE)?;
            Operation::UpdateExtent { path, file_offset, size }
        }
        // Consumed for offset correctness, unused downstream.
        other => Operation::Other(other),
    };
    Ok(op)
}

/// Cursor over one record's attribute payload. `base` is the payload's
/// absolute stream offset, kept for error reporting.
struct AttrCursor<'a> {
    payload: &'a [u8],
    pos: usize,
    base: usize,
}

impl<'a> AttrCursor<'a> {
    fn new(payload: &'a [u8], base: usize) -> Self {
        Self { payload, pos: 0, base }
    }

    fn offset(&self) -> usize {
        self.base + self.pos
    }

    /// Read one TLV header, check the type tag against the expectation for
    /// this position, and return the value bytes.
    fn value(&mut self, expected: u16) -> DecodeResult<&'a [u8]> {
        let offset = self.offset();
        let remaining = self.payload.len() - self.pos;
        if remaining < TLV_HEADER_LEN {
            return Err(DecodeError::AttributeOverrun {
                offset,
                claimed: TLV_HEADER_LEN,
                available: remaining,
            });
        }
        let found = read_u16(self.payload, self.pos);
        let len = read_u16(self.payload, self.pos + 2) as usize;
        if found != expected {
            return Err(DecodeError::UnexpectedAttribute {
                offset,
                expected: attr::name(expected),
                found: attr::name(found),
            });
        }
        let start = self.pos + TLV_HEADER_LEN;
        if len > self.payload.len() - start {
            return Err(DecodeError::AttributeOverrun {
                offset,
                claimed: len,
                available: self.payload.len() - start,
            });
        }
        self.pos = start + len;
        Ok(&self.payload[start..start + len])
    }

    fn string(&mut self, expected: u16) -> DecodeResult<String> {
        let offset = self.offset();
        let value = self.value(expected)?;
        let s = std::str::from_utf8(value)
            .map_err(|_| DecodeError::InvalidString { offset, attr: attr::name(expected) })?;
        Ok(s.to_string())
    }

    fn u64(&mut self, expected: u16) -> DecodeResult<u64> {
        let offset = self.offset();
        let value = self.value(expected)?;
        let bytes: [u8; 8] = value.try_into().map_err(|_| DecodeError::BadAttributeWidth {
            offset,
            attr: attr::name(expected),
            len: value.len(),
            expected: 8,
        })?;
        Ok(u64::from_le_bytes(bytes))
    }
}

fn read_u32(buf: &[u8], pos: usize) -> u32 {
    u32::from_le_bytes([buf[pos], buf[pos + 1], buf[pos + 2], buf[pos + 3]])
}

fn read_u16(buf: &[u8], pos: usize) -> u16 {
    u16::from_le_bytes([buf[pos], buf[pos + 1]])
}
