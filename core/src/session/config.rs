//! session/config.rs
//! Per-session tuning: staging capacities and compression level.

use thiserror::Error;

use crate::compression::codecs::{recommended_decoder_input, recommended_decoder_output, recommended_encoder_output};
use crate::compression::{DEFAULT_LEVEL_ZSTD, MAX_LEVEL_ZSTD, MIN_LEVEL_ZSTD};
use crate::session::types::Mode;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{which} capacity must be non-zero")]
    ZeroCapacity { which: &'static str },

    #[error("compression level {level} outside {min}..={max}")]
    LevelOutOfRange { level: i32, min: i32, max: i32 },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionConfig {
    /// Input staging capacity (load mode).
    /// - `None` → zstd's recommended stream input size.
    pub input_capacity: Option<usize>,

    /// Output staging capacity. Decompressed window in load mode, compressed
    /// spill window in store mode.
    /// - `None` → zstd's recommended stream output size for the mode.
    pub output_capacity: Option<usize>,

    /// Compression level (store mode).
    /// - `None` → `DEFAULT_LEVEL_ZSTD`.
    pub compression_level: Option<i32>,
}

impl SessionConfig {
    pub fn new(input_capacity: Option<usize>, output_capacity: Option<usize>, compression_level: Option<i32>) -> Self {
        Self { input_capacity, output_capacity, compression_level }
    }

    /// Explicit staging capacities, default level.
    pub fn with_capacities(input_capacity: usize, output_capacity: usize) -> Self {
        Self { input_capacity: Some(input_capacity), output_capacity: Some(output_capacity), compression_level: None }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input_capacity == Some(0) {
            return Err(ConfigError::ZeroCapacity { which: "input" });
        }
        if self.output_capacity == Some(0) {
            return Err(ConfigError::ZeroCapacity { which: "output" });
        }
        validate_level(self.level())
    }

    pub fn level(&self) -> i32 {
        self.compression_level.unwrap_or(DEFAULT_LEVEL_ZSTD)
    }

    /// Store mode never stages compressed input, so it gets no input buffer.
    pub fn input_capacity_for(&self, mode: Mode) -> usize {
        match mode {
            Mode::Load  => self.input_capacity.unwrap_or_else(recommended_decoder_input),
            Mode::Store => 0,
        }
    }

    pub fn output_capacity_for(&self, mode: Mode) -> usize {
        match mode {
            Mode::Load  => self.output_capacity.unwrap_or_else(recommended_decoder_output),
            Mode::Store => self.output_capacity.unwrap_or_else(recommended_encoder_output),
        }
    }
}

pub fn validate_level(level: i32) -> Result<(), ConfigError> {
    if !(MIN_LEVEL_ZSTD..=MAX_LEVEL_ZSTD).contains(&level) {
        return Err(ConfigError::LevelOutOfRange { level, min: MIN_LEVEL_ZSTD, max: MAX_LEVEL_ZSTD });
    }
    Ok(())
}
