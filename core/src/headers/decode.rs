//! headers/decode.rs
//!
//! Header decoding.
//!
//! Design notes:
//! - The version is checked before anything else so a foreign file is reported
//!   as such even when it is also shorter than a header.
//! - A short read anywhere in the header is fatal.

use std::io::{ErrorKind, Read};

use byteorder::{ByteOrder, NativeEndian};

use crate::constants::{DICT_OFFSET, DICT_SIZE_OFFSET, MAX_DICTIONARY_SIZE};
use crate::headers::types::{FileHeader, HeaderError};

const VERSION_LEN: usize = 8;

/// Decode the header fields and copy out the dictionary slot.
pub fn decode_header_ne(buf: &[u8]) -> Result<(FileHeader, Box<[u8]>), HeaderError> {
    if buf.len() < VERSION_LEN {
        return Err(HeaderError::Truncated { have: buf.len(), need: FileHeader::LEN });
    }
    let version = NativeEndian::read_u64(&buf[..VERSION_LEN]);
    let partial = FileHeader { version, dict_size_used: 0 };
    partial.validate()?;

    if buf.len() < FileHeader::LEN {
        return Err(HeaderError::Truncated { have: buf.len(), need: FileHeader::LEN });
    }
    let dict_at = DICT_SIZE_OFFSET as usize;
    let slot_at = DICT_OFFSET as usize;
    let h = FileHeader {
        version,
        dict_size_used: NativeEndian::read_u64(&buf[dict_at..slot_at]),
    };
    h.validate()?;

    let slot = buf[slot_at..slot_at + MAX_DICTIONARY_SIZE].to_vec().into_boxed_slice();
    Ok((h, slot))
}

/// Read and decode a header from the start of `r`.
pub fn read_header<R: Read>(r: &mut R) -> Result<(FileHeader, Box<[u8]>), HeaderError> {
    let mut buf = vec![0u8; FileHeader::LEN];
    let mut have = 0;
    while have < buf.len() {
        match r.read(&mut buf[have..]) {
            Ok(0) => break,
            Ok(n) => have += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(HeaderError::Io(e)),
        }
    }
    decode_header_ne(&buf[..have])
}
