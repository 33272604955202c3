//! headers/mod.rs
//! Fixed-size file header: version, dictionary size and dictionary slot.
//!
//! Notes:
//! - Native byte order; files are not portable across endianness.
//! - The dictionary slot is fixed at `MAX_DICTIONARY_SIZE`, so the compressed
//!   stream always starts at `HEADER_LEN` and the slot can be rewritten in place.

pub mod types;
pub mod encode;
pub mod decode;

pub use types::*;
pub use encode::*;
pub use decode::*;
