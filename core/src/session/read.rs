//! session/read.rs
//! Streaming reader: delivers exactly the requested number of decompressed
//! bytes per call, whatever the relation between request size and staging
//! capacities.
//!
//! Two strategies, chosen per call:
//! - immediate (`size > output capacity`): the decoder writes straight into
//!   the caller's buffer; the output window must already be drained.
//! - buffered (`size <= output capacity`): the decoder fills the whole output
//!   window and the caller is served from it; leftovers wait for the next call.
//!
//! Both compact the input window before every refill, so the input buffer
//! never needs more than its fixed capacity regardless of stream length.

use std::time::Instant;

use tracing::{debug, trace};

use crate::session::context::Session;
use crate::session::types::{Mode, SessionError};
use crate::telemetry::Stage;
use crate::types::StoreError;

impl Session {
    /// Fill `destination` completely from the decompressed stream.
    ///
    /// # Errors
    /// - `SessionError::WrongMode` outside load mode.
    /// - `SessionError::PendingOutput` when an immediate read follows a
    ///   buffered read that left bytes in the output window. The session stays
    ///   usable; drain the window with reads no larger than
    ///   `output_capacity()` first.
    /// - `SessionError::UnexpectedEof` when the file ends before
    ///   `destination` is full.
    /// - Engine and I/O errors. These poison the session.
    pub fn read(&mut self, destination: &mut [u8]) -> Result<(), StoreError> {
        self.ensure_mode(Mode::Load, "read")?;
        self.ensure_usable()?;
        if destination.is_empty() {
            return Ok(());
        }

        let immediate = destination.len() > self.output.capacity();
        debug!(size = destination.len(), immediate, buffered = self.output.pending_len(), "read");

        let result = if immediate {
            self.read_immediate(destination)
        } else {
            self.read_buffered(destination)
        };
        if result.is_ok() {
            self.counters.add_read(destination.len(), immediate);
        }
        self.track("read", result)
    }

    /// Like `read`, but first serves any bytes pending in the output window,
    /// so a request larger than `output_capacity()` may follow a small one.
    ///
    /// The window is drained by a buffered read before the remainder is
    /// requested, which keeps the byte order without mixing the two strategies
    /// within one engine pass.
    pub fn read_draining(&mut self, destination: &mut [u8]) -> Result<(), StoreError> {
        let pending = self.buffered_len().min(destination.len());
        let (head, tail) = destination.split_at_mut(pending);
        if !head.is_empty() {
            self.read(head)?;
        }
        self.read(tail)
    }

    fn read_immediate(&mut self, destination: &mut [u8]) -> Result<(), StoreError> {
        // Mixing a pending window with a direct-target decode would reorder bytes.
        if !self.output.is_drained() {
            return Err(SessionError::PendingOutput { pending: self.output.pending_len() }.into());
        }

        let requested = destination.len();
        let mut written = 0usize;
        while written < requested {
            self.refill_input()?;

            let mut progressed = false;
            loop {
                let decoder = self.decoder.as_mut().ok_or(SessionError::Closed)?;
                let started = Instant::now();
                let progress = decoder.decompress(self.input.pending(), &mut destination[written..])?;
                self.timer.record_since(Stage::Decompress, started);
                self.counters.add_engine_call();

                self.input.consume(progress.consumed);
                written += progress.produced;

                if progress.is_stalled() {
                    break;
                }
                progressed = true;
                if written == requested || self.input.is_drained() {
                    break;
                }
            }

            if !progressed {
                return Err(SessionError::UnexpectedEof { requested, delivered: written }.into());
            }
        }

        debug_assert_eq!(written, requested);
        self.output.clear();
        Ok(())
    }

    fn read_buffered(&mut self, destination: &mut [u8]) -> Result<(), StoreError> {
        let requested = destination.len();

        // Leftovers from the previous call go first.
        let mut read = self.output.drain_into(destination);
        self.counters.add_cache_hit(read);

        while read < requested {
            self.refill_input()?;

            let mut progressed = false;
            loop {
                // Only reached with a drained window, so the whole buffer is free.
                debug_assert!(self.output.is_drained());
                let decoder = self.decoder.as_mut().ok_or(SessionError::Closed)?;
                let started = Instant::now();
                let progress = decoder.decompress(self.input.pending(), self.output.whole_mut())?;
                self.timer.record_since(Stage::Decompress, started);
                self.counters.add_engine_call();

                self.input.consume(progress.consumed);
                self.output.reset_window(progress.produced);
                read += self.output.drain_into(&mut destination[read..]);

                if progress.is_stalled() {
                    break;
                }
                progressed = true;
                if read == requested || self.input.is_drained() {
                    break;
                }
            }

            if !progressed {
                return Err(SessionError::UnexpectedEof { requested, delivered: read }.into());
            }
        }

        debug_assert_eq!(read, requested);
        Ok(())
    }

    /// Compact the input window and top it up from the file.
    fn refill_input(&mut self) -> Result<usize, StoreError> {
        self.input.compact();
        let file = self.file.as_mut().ok_or(SessionError::Closed)?;
        let started = Instant::now();
        let fetched = self.input.refill_from(file)?;
        self.timer.record_since(Stage::Refill, started);
        self.counters.add_refill(fetched);
        trace!(fetched, pending = self.input.pending_len(), capacity = self.input.capacity(), "input refilled");
        Ok(fetched)
    }
}
