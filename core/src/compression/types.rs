//! compression/types.rs
//! Engine seam: the streaming encoder/decoder traits and their error type.
//!
//! The engines work on caller-owned byte windows and report how much they
//! consumed and produced. They never own staging memory; the session does.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompressionError {
    #[error("codec {codec} init failed: {msg}")]
    CodecInitFailed { codec: String, msg: String },

    #[error("codec {codec} process failed: {msg}")]
    CodecProcessFailed { codec: String, msg: String },

    #[error("dictionary training failed: {msg}")]
    TrainingFailed { msg: String },

    #[error("dictionary too large: {have} > {max}")]
    DictionaryTooLarge { have: usize, max: usize },
}

/// Result of one engine invocation over an input and an output window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    /// Bytes taken from the front of the input window.
    pub consumed: usize,
    /// Bytes written to the front of the output window.
    pub produced: usize,
}

impl Progress {
    #[inline]
    pub fn is_stalled(&self) -> bool {
        self.consumed == 0 && self.produced == 0
    }
}

/// Result of a flush/finish step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Drain {
    /// Bytes written to the output window by this step.
    pub produced: usize,
    /// Engine hint of bytes still held internally; 0 means fully drained.
    pub remaining: usize,
}

// Require Send so sessions can be moved across threads.
pub trait StreamEncoder: Send {
    /// Compress as much of `input` as fits into `output`.
    fn compress(&mut self, input: &[u8], output: &mut [u8]) -> Result<Progress, CompressionError>;
    /// Push internally buffered data out without ending the frame.
    fn flush(&mut self, output: &mut [u8]) -> Result<Drain, CompressionError>;
    /// End the current frame.
    fn finish(&mut self, output: &mut [u8]) -> Result<Drain, CompressionError>;
    /// Change the compression level for data not yet compressed.
    fn set_level(&mut self, level: i32) -> Result<(), CompressionError>;
}

pub trait StreamDecoder: Send {
    /// Decompress as much of `input` as fits into `output`.
    fn decompress(&mut self, input: &[u8], output: &mut [u8]) -> Result<Progress, CompressionError>;
}
