//! compression/mod.rs
//! Streaming compression engines and dictionary handling.
//!
//! - `types` defines the engine seam the session drives.
//! - `codecs::zstd` binds the seam to zstd streaming contexts.
//! - `dict` owns the fixed-capacity dictionary slot and training.

pub mod constants;
pub mod types;
pub mod codecs;
pub mod dict;

pub use constants::*;
pub use types::*;
pub use dict::*;
