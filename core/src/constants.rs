//! constants.rs
//! Format constants shared by the header codec, the trainer and engine priming.

/// On-disk format version. Written at offset 0 and required to match on load.
/// Bump whenever the header layout or `MAX_DICTIONARY_SIZE` changes.
pub const FORMAT_VERSION: u64 = 0x0001_0000;

/// Fixed capacity of the dictionary slot (64 KiB).
///
/// Baked into the header layout: the slot is always written in full, so this
/// is not configurable per session.
pub const MAX_DICTIONARY_SIZE: usize = 64 * 1024;

/// Training input is capped at `MAX_DICTIONARY_SIZE * TRAINING_CAP_FACTOR` bytes.
pub const TRAINING_CAP_FACTOR: usize = 100;

/// Header field offsets (bytes).
pub const VERSION_OFFSET: u64 = 0;
pub const DICT_SIZE_OFFSET: u64 = 8;
pub const DICT_OFFSET: u64 = 16;

/// Total header length; the compressed stream starts here.
pub const HEADER_LEN: usize = DICT_OFFSET as usize + MAX_DICTIONARY_SIZE;
