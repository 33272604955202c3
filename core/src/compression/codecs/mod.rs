//! compression/codecs/mod.rs
//! Engine bindings.

pub mod zstd;

pub use zstd::*;
