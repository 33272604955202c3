//! headers/types.rs
//! Fixed file header.
//!
//! Layout (native byte order):
//!
//! ```text
//! [ format version (8)              ]  offset 0
//! [ dict_size_used (8)              ]  offset 8
//! [ dictionary slot (MAX_DICT_SIZE) ]  offset 16, always written in full
//! [ compressed stream ...           ]  offset HEADER_LEN
//! ```

use thiserror::Error;

use crate::constants::{FORMAT_VERSION, HEADER_LEN, MAX_DICTIONARY_SIZE};

#[derive(Debug, Error)]
pub enum HeaderError {
    #[error("header truncated: have {have} bytes, need {need}")]
    Truncated { have: usize, need: usize },

    #[error("format version mismatch: found 0x{found:x}, expected 0x{expected:x}")]
    VersionMismatch { found: u64, expected: u64 },

    #[error("dictionary size {size} exceeds slot capacity {max}")]
    DictionaryTooLarge { size: u64, max: usize },

    #[error("header slot has {have} bytes, expected {need}")]
    SlotLength { have: usize, need: usize },

    #[error("header I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Scalar header fields. The dictionary slot travels separately because it is
/// owned by the session's `Dictionary`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    pub version: u64,
    pub dict_size_used: u64,
}

impl Default for FileHeader {
    /// Current version, no dictionary.
    fn default() -> Self {
        Self { version: FORMAT_VERSION, dict_size_used: 0 }
    }
}

impl FileHeader {
    pub const LEN: usize = HEADER_LEN;

    pub fn with_dictionary(dict_size_used: usize) -> Self {
        Self { version: FORMAT_VERSION, dict_size_used: dict_size_used as u64 }
    }

    pub fn validate(&self) -> Result<(), HeaderError> {
        if self.version != FORMAT_VERSION {
            return Err(HeaderError::VersionMismatch { found: self.version, expected: FORMAT_VERSION });
        }
        if self.dict_size_used > MAX_DICTIONARY_SIZE as u64 {
            return Err(HeaderError::DictionaryTooLarge { size: self.dict_size_used, max: MAX_DICTIONARY_SIZE });
        }
        Ok(())
    }

    /// Dictionary length as a slice bound. Only meaningful after `validate`.
    pub fn dict_len(&self) -> usize {
        self.dict_size_used as usize
    }
}
