//! src/compression/codecs/zstd.rs
//!
//! Zstd streaming encoder/decoder.
//!
//! Design notes:
//! - Wraps `zstd::stream::raw` contexts behind the `StreamEncoder`/`StreamDecoder` seam.
//! - Each call maps one `ZSTD_compressStream`/`ZSTD_decompressStream` invocation:
//!   consumption and production are whatever the engine decides.
//! - A dictionary is digested into the context at construction time
//!   (`ZSTD_*Ctx_loadDictionary`); the context keeps no borrow of the caller's slot.
//! - Errors are mapped into `CompressionError` variants carrying zstd's diagnostic.

use zstd::stream::raw::{Decoder, Encoder, InBuffer, Operation, OutBuffer};
use zstd_safe::CParameter;

use crate::compression::constants::CODEC_ZSTD;
use crate::compression::types::{CompressionError, Drain, Progress, StreamDecoder, StreamEncoder};

/// Zstd streaming compressor.
pub struct ZstdStreamEncoder {
    context: Encoder<'static>,
}

/// Zstd streaming decompressor.
pub struct ZstdStreamDecoder {
    context: Decoder<'static>,
}

fn init_failed(e: std::io::Error) -> CompressionError {
    CompressionError::CodecInitFailed { codec: CODEC_ZSTD.into(), msg: e.to_string() }
}

fn process_failed(e: std::io::Error) -> CompressionError {
    CompressionError::CodecProcessFailed { codec: CODEC_ZSTD.into(), msg: e.to_string() }
}

impl ZstdStreamEncoder {
    /// Create a new encoder with given level and optional dictionary.
    ///
    /// # Errors
    /// - Returns `CompressionError::CodecInitFailed` if the context rejects the
    ///   level or the dictionary.
    pub fn new(level: i32, dict: Option<&[u8]>) -> Result<Self, CompressionError> {
        let context = match dict {
            Some(d) if !d.is_empty() => Encoder::with_dictionary(level, d).map_err(init_failed)?,
            _ => Encoder::new(level).map_err(init_failed)?,
        };
        Ok(Self { context })
    }

    /// Boxed form used by the session.
    pub fn boxed(level: i32, dict: Option<&[u8]>) -> Result<Box<dyn StreamEncoder>, CompressionError> {
        Ok(Box::new(Self::new(level, dict)?))
    }
}

impl StreamEncoder for ZstdStreamEncoder {
    fn compress(&mut self, input: &[u8], output: &mut [u8]) -> Result<Progress, CompressionError> {
        let mut src = InBuffer::around(input);
        let mut dst = OutBuffer::around(output);
        self.context.run(&mut src, &mut dst).map_err(process_failed)?;
        Ok(Progress { consumed: src.pos(), produced: dst.pos() })
    }

    fn flush(&mut self, output: &mut [u8]) -> Result<Drain, CompressionError> {
        let mut dst = OutBuffer::around(output);
        let remaining = self.context.flush(&mut dst).map_err(process_failed)?;
        Ok(Drain { produced: dst.pos(), remaining })
    }

    fn finish(&mut self, output: &mut [u8]) -> Result<Drain, CompressionError> {
        let mut dst = OutBuffer::around(output);
        let remaining = self.context.finish(&mut dst, true).map_err(process_failed)?;
        Ok(Drain { produced: dst.pos(), remaining })
    }

    fn set_level(&mut self, level: i32) -> Result<(), CompressionError> {
        self.context
            .set_parameter(CParameter::CompressionLevel(level))
            .map_err(init_failed)
    }
}

impl ZstdStreamDecoder {
    /// Create a new decoder, primed with `dict` when present.
    ///
    /// The context digests its own copy; the session's dictionary slot stays
    /// the persisted source of truth.
    pub fn new(dict: Option<&[u8]>) -> Result<Self, CompressionError> {
        let context = match dict {
            Some(d) if !d.is_empty() => Decoder::with_dictionary(d).map_err(init_failed)?,
            _ => Decoder::new().map_err(init_failed)?,
        };
        Ok(Self { context })
    }

    pub fn boxed(dict: Option<&[u8]>) -> Result<Box<dyn StreamDecoder>, CompressionError> {
        Ok(Box::new(Self::new(dict)?))
    }
}

impl StreamDecoder for ZstdStreamDecoder {
    fn decompress(&mut self, input: &[u8], output: &mut [u8]) -> Result<Progress, CompressionError> {
        let mut src = InBuffer::around(input);
        let mut dst = OutBuffer::around(output);
        self.context.run(&mut src, &mut dst).map_err(process_failed)?;
        Ok(Progress { consumed: src.pos(), produced: dst.pos() })
    }
}

/// Recommended staging capacities for the engine (zstd's `*StreamInSize`/`*StreamOutSize`).
pub fn recommended_decoder_input() -> usize {
    zstd_safe::DCtx::in_size()
}

pub fn recommended_decoder_output() -> usize {
    zstd_safe::DCtx::out_size()
}

pub fn recommended_encoder_output() -> usize {
    zstd_safe::CCtx::out_size()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compression::constants::DEFAULT_LEVEL_ZSTD as DEFAULT_LEVEL;

    fn compress_all(enc: &mut ZstdStreamEncoder, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        let mut window = vec![0u8; 256];
        let mut consumed = 0;
        while consumed < data.len() {
            let p = enc.compress(&data[consumed..], &mut window).unwrap();
            consumed += p.consumed;
            out.extend_from_slice(&window[..p.produced]);
        }
        loop {
            let d = enc.finish(&mut window).unwrap();
            out.extend_from_slice(&window[..d.produced]);
            if d.remaining == 0 {
                break;
            }
        }
        out
    }

    #[test]
    fn decoder_reports_partial_progress_on_small_output() {
        let data: Vec<u8> = (0..10_000u32).flat_map(|i| (i % 97).to_le_bytes()).collect();
        let mut enc = ZstdStreamEncoder::new(3, None).unwrap();
        let frame = compress_all(&mut enc, &data);

        let mut dec = ZstdStreamDecoder::new(None).unwrap();
        let mut out = [0u8; 16];
        let p = dec.decompress(&frame, &mut out).unwrap();
        assert!(p.produced <= out.len());
        assert!(!p.is_stalled());
    }

    #[test]
    fn garbage_input_is_an_engine_error() {
        let mut dec = ZstdStreamDecoder::new(None).unwrap();
        let mut out = [0u8; 64];
        match dec.decompress(&[0xFFu8; 32], &mut out) {
            Err(CompressionError::CodecProcessFailed { codec, .. }) => assert_eq!(codec, "zstd"),
            other => panic!("expected process failure, got {other:?}"),
        }
    }

    #[test]
    fn round_trip_through_small_windows() {
        let data = b"abcabcabcabcabcabcabc-streaming-window".repeat(64);
        let mut enc = ZstdStreamEncoder::new(DEFAULT_LEVEL, None).unwrap();
        let frame = compress_all(&mut enc, &data);

        let mut dec = ZstdStreamDecoder::new(None).unwrap();
        let mut out = Vec::new();
        let mut window = [0u8; 7];
        let mut pos = 0;
        while out.len() < data.len() {
            let p = dec.decompress(&frame[pos..], &mut window).unwrap();
            pos += p.consumed;
            out.extend_from_slice(&window[..p.produced]);
        }
        assert_eq!(out, data);
    }
}
