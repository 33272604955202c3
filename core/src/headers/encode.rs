//! headers/encode.rs
//!
//! Header encoding.
//!
//! Design notes:
//! - `encode_header_ne` serializes the full fixed-size header into a buffer.
//! - `rewrite_dictionary_fields` patches `dict_size_used` and the slot in place
//!   and leaves the cursor at end-of-file so appended data is never truncated.

use std::io::{Seek, SeekFrom, Write};

use byteorder::{NativeEndian, WriteBytesExt};

use crate::constants::{DICT_SIZE_OFFSET, MAX_DICTIONARY_SIZE};
use crate::headers::types::{FileHeader, HeaderError};

/// Serialize the header and padded dictionary slot.
pub fn encode_header_ne(h: &FileHeader, slot: &[u8]) -> Result<Vec<u8>, HeaderError> {
    if slot.len() != MAX_DICTIONARY_SIZE {
        return Err(HeaderError::SlotLength { have: slot.len(), need: MAX_DICTIONARY_SIZE });
    }
    let mut out = Vec::with_capacity(FileHeader::LEN);
    out.write_u64::<NativeEndian>(h.version)?;        // 0..8   version
    out.write_u64::<NativeEndian>(h.dict_size_used)?; // 8..16  dict_size_used
    out.extend_from_slice(slot);                      // 16..   dictionary slot

    debug_assert_eq!(out.len(), FileHeader::LEN, "encoding wrote incorrect length");
    Ok(out)
}

/// Write a complete header at the current position.
pub fn write_header<W: Write>(w: &mut W, h: &FileHeader, slot: &[u8]) -> Result<(), HeaderError> {
    let buf = encode_header_ne(h, slot)?;
    w.write_all(&buf)?;
    Ok(())
}

/// Rewrite `dict_size_used` + slot at offset 8, then seek back to end-of-file.
pub fn rewrite_dictionary_fields<W: Write + Seek>(
    w: &mut W,
    dict_size_used: usize,
    slot: &[u8],
) -> Result<(), HeaderError> {
    if slot.len() != MAX_DICTIONARY_SIZE {
        return Err(HeaderError::SlotLength { have: slot.len(), need: MAX_DICTIONARY_SIZE });
    }
    w.seek(SeekFrom::Start(DICT_SIZE_OFFSET))?;
    w.write_u64::<NativeEndian>(dict_size_used as u64)?;
    w.write_all(slot)?;
    w.seek(SeekFrom::End(0))?;
    Ok(())
}
