//! session/write.rs
//! Store-mode write path: the mirror of the streaming reader.
//!
//! The encoder writes into the free tail of the output staging buffer; a full
//! buffer is spilled to the file before the next engine call.

use std::time::Instant;

use tracing::debug;

use crate::compression::{CompressionError, CODEC_ZSTD};
use crate::session::context::Session;
use crate::session::types::{Mode, SessionError};
use crate::telemetry::Stage;
use crate::types::StoreError;

impl Session {
    /// Compress `source` into the stream.
    pub fn write(&mut self, source: &[u8]) -> Result<(), StoreError> {
        self.ensure_mode(Mode::Store, "write")?;
        self.ensure_usable()?;
        if source.is_empty() {
            return Ok(());
        }

        let result = self.write_inner(source);
        if result.is_ok() {
            self.written += source.len() as u64;
            self.counters.add_write(source.len());
        }
        self.track("write", result)
    }

    /// Push everything compressed so far to the file without ending the frame.
    pub fn flush(&mut self) -> Result<(), StoreError> {
        self.ensure_mode(Mode::Store, "flush")?;
        self.ensure_usable()?;
        let result = self.drain_encoder(false);
        self.track("flush", result)
    }

    fn write_inner(&mut self, source: &[u8]) -> Result<(), StoreError> {
        let mut consumed = 0usize;
        while consumed < source.len() {
            if self.output.is_full() {
                self.spill_output()?;
            }

            let encoder = self.encoder.as_mut().ok_or(SessionError::Closed)?;
            let started = Instant::now();
            let progress = encoder.compress(&source[consumed..], self.output.spare_mut())?;
            self.timer.record_since(Stage::Compress, started);
            self.counters.add_engine_call();

            consumed += progress.consumed;
            self.output.commit(progress.produced);

            if progress.is_stalled() && !self.output.is_full() {
                return Err(stalled("compress").into());
            }
        }
        Ok(())
    }

    /// Drive the encoder's flush (or frame end when `finish`) until it holds
    /// nothing back, then spill the output window.
    pub(crate) fn drain_encoder(&mut self, finish: bool) -> Result<(), StoreError> {
        loop {
            if self.output.is_full() {
                self.spill_output()?;
            }

            let encoder = self.encoder.as_mut().ok_or(SessionError::Closed)?;
            let started = Instant::now();
            let drain = if finish {
                encoder.finish(self.output.spare_mut())?
            } else {
                encoder.flush(self.output.spare_mut())?
            };
            self.timer.record_since(Stage::Compress, started);
            self.counters.add_engine_call();
            self.output.commit(drain.produced);

            if drain.remaining == 0 {
                break;
            }
            if drain.produced == 0 && !self.output.is_full() {
                return Err(stalled(if finish { "finish" } else { "flush" }).into());
            }
        }
        self.spill_output()?;
        debug!(finish, compressed = self.counters.bytes_compressed, "encoder drained");
        Ok(())
    }

    fn spill_output(&mut self) -> Result<(), StoreError> {
        let file = self.file.as_mut().ok_or(SessionError::Closed)?;
        let started = Instant::now();
        let n = self.output.spill_to(file)?;
        if n > 0 {
            self.timer.record_since(Stage::Spill, started);
            self.counters.add_spill(n);
        }
        Ok(())
    }
}

fn stalled(step: &str) -> CompressionError {
    CompressionError::CodecProcessFailed {
        codec: CODEC_ZSTD.into(),
        msg: format!("{step} made no progress with free output space"),
    }
}
