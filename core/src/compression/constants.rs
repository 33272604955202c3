//! compression/constants.rs
//! Engine identifiers and level defaults.

/// Engine name used in error context.
pub const CODEC_ZSTD: &str = "zstd";

/// Default compression level (balanced).
pub const DEFAULT_LEVEL_ZSTD: i32 = 6;

/// Valid level range accepted by `SessionConfig` and `set_compression_level`.
/// Negative levels select zstd's fast modes.
pub const MIN_LEVEL_ZSTD: i32 = -7;
pub const MAX_LEVEL_ZSTD: i32 = 22;
