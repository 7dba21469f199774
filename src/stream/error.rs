use thiserror::Error;

pub type DecodeResult<T> = Result<T, DecodeError>;

/// Send-stream decode failures. All of them are fatal to the whole decode;
/// no partial command list is ever returned.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("not a btrfs send stream (magic mismatch)")]
    BadMagic,

    #[error("stream too short for header: {0} bytes (min 17)")]
    ShortHeader(usize),

    #[error("unknown command tag {tag} at offset {offset}")]
    UnknownCommand { offset: usize, tag: u16 },

    #[error("unexpected attribute {found} at offset {offset}, expected {expected}")]
    UnexpectedAttribute { offset: usize, expected: &'static str, found: &'static str },

    #[error("attribute at offset {offset} claims {claimed} bytes but only {available} remain in the record")]
    AttributeOverrun { offset: usize, claimed: usize, available: usize },

    #[error("attribute {attr} at offset {offset} is {len} bytes, expected {expected}")]
    BadAttributeWidth { offset: usize, attr: &'static str, len: usize, expected: usize },

    #[error("attribute {attr} at offset {offset} is not valid utf-8")]
    InvalidString { offset: usize, attr: &'static str },

    #[error("stream truncated at offset {offset}: buffer ended before the end command")]
    Truncated { offset: usize },
}

impl DecodeError {
    /// True for the buffer-cut-short condition, false for every malformed
    /// stream condition.
    pub fn is_truncation(&self) -> bool {
        matches!(self, DecodeError::Truncated { .. })
    }
}
