//! Btrfs send-stream decoding.
//!
//! Turns the raw byte buffer produced by `btrfs send` into an ordered
//! sequence of typed commands. Nothing leaves this module unvalidated: the
//! stream header, every command tag, and every attribute TLV are checked
//! against the wire format before any data reaches the classifier.

mod command;
mod decoder;
mod error;

pub use command::{CommandTag, Operation, RawCommand};
pub use decoder::{STREAM_MAGIC, StreamDecoder, decode_stream};
pub use error::{DecodeError, DecodeResult};
