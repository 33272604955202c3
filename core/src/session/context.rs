//! session/context.rs
//! Session lifecycle: open (header, buffers, engine priming) and close
//! (finish stream, header rewrite, ordered release).

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{info, warn};

use crate::compression::codecs::{ZstdStreamDecoder, ZstdStreamEncoder};
use crate::compression::{Dictionary, StreamDecoder, StreamEncoder};
use crate::constants::{DICT_OFFSET, DICT_SIZE_OFFSET, MAX_DICTIONARY_SIZE};
use crate::headers::{read_header, rewrite_dictionary_fields, write_header, FileHeader};
use crate::session::buffer::StagingBuffer;
use crate::session::config::SessionConfig;
use crate::session::types::{Mode, SessionError};
use crate::telemetry::{SessionCounters, Stage, TelemetrySnapshot, TelemetryTimer};
use crate::types::StoreError;

/// One open store file.
///
/// Field order matters for teardown: the engines are released before the
/// dictionary they were primed from.
pub struct Session {
    pub(crate) mode: Mode,
    pub(crate) path: PathBuf,
    pub(crate) level: i32,

    pub(crate) encoder: Option<Box<dyn StreamEncoder>>,
    pub(crate) decoder: Option<Box<dyn StreamDecoder>>,
    pub(crate) dictionary: Dictionary,

    /// Compressed bytes not yet fed to the decoder (load).
    pub(crate) input: StagingBuffer,
    /// Decompressed bytes not yet delivered (load) or compressed bytes not
    /// yet written to the file (store).
    pub(crate) output: StagingBuffer,

    pub(crate) file: Option<File>,

    /// Payload bytes accepted so far (store).
    pub(crate) written: u64,
    pub(crate) poisoned: bool,

    pub(crate) counters: SessionCounters,
    pub(crate) timer: TelemetryTimer,
}

impl Session {
    /// Open with default capacities and level.
    pub fn open<P: AsRef<Path>>(mode: Mode, path: P) -> Result<Self, StoreError> {
        Self::open_with_config(mode, path, SessionConfig::default())
    }

    /// Open from an untyped mode value; unknown modes fail before the
    /// filesystem is touched.
    pub fn open_raw<P: AsRef<Path>>(mode: u8, path: P) -> Result<Self, StoreError> {
        let mode = Mode::verify(mode)?;
        Self::open(mode, path)
    }

    /// Open `path` for `mode`.
    ///
    /// Load reads and validates the header and primes the decoder with the
    /// stored dictionary. Store truncates the file and writes a header with an
    /// empty dictionary slot, rewritten at close.
    ///
    /// Nothing is leaked on failure: every resource acquired so far is a local
    /// that drops on the error path.
    pub fn open_with_config<P: AsRef<Path>>(mode: Mode, path: P, config: SessionConfig) -> Result<Self, StoreError> {
        config.validate()?;
        let mut timer = TelemetryTimer::new();
        let started = Instant::now();
        let path = path.as_ref().to_path_buf();
        let level = config.level();

        let mut counters = SessionCounters::default();
        let mut encoder: Option<Box<dyn StreamEncoder>> = None;
        let mut decoder: Option<Box<dyn StreamDecoder>> = None;

        let (file, dictionary) = match mode {
            Mode::Load => {
                let mut file = File::open(&path)?;
                let (header, slot) = read_header(&mut file)?;
                let dictionary = Dictionary::from_slot(slot, header.dict_len())?;
                decoder = Some(ZstdStreamDecoder::boxed(dictionary.for_engine())?);
                counters.add_header(FileHeader::LEN);
                (file, dictionary)
            }
            Mode::Store => {
                let mut file = OpenOptions::new()
                    .read(true)
                    .write(true)
                    .create(true)
                    .truncate(true)
                    .open(&path)?;
                let dictionary = Dictionary::new();
                write_header(&mut file, &FileHeader::default(), dictionary.slot())?;
                encoder = Some(ZstdStreamEncoder::boxed(level, None)?);
                counters.add_header(FileHeader::LEN);
                (file, dictionary)
            }
        };

        timer.record_since(Stage::Open, started);

        let session = Session {
            mode,
            path,
            level,
            encoder,
            decoder,
            input: StagingBuffer::with_capacity(config.input_capacity_for(mode)),
            output: StagingBuffer::with_capacity(config.output_capacity_for(mode)),
            dictionary,
            file: Some(file),
            written: 0,
            poisoned: false,
            counters,
            timer,
        };

        info!(
            mode = %mode,
            path = %session.path.display(),
            dict_len = session.dictionary.used(),
            input_capacity = session.input.capacity(),
            output_capacity = session.output.capacity(),
            "session opened"
        );
        Ok(session)
    }

    /// Finish the session and return its final telemetry.
    ///
    /// Store mode ends the compressed stream, rewrites the dictionary fields in
    /// the header and returns to end-of-file. Every step runs even when an
    /// earlier one fails; the first failure is returned.
    pub fn close(mut self) -> Result<TelemetrySnapshot, StoreError> {
        let result = self.finalize();
        self.timer.finish();
        let snapshot = TelemetrySnapshot::from(&self.counters, &self.timer);
        result.map(|_| snapshot)
    }

    /// Best-effort teardown. Idempotent: a second call is a no-op.
    pub(crate) fn finalize(&mut self) -> Result<(), StoreError> {
        if self.file.is_none() {
            return Ok(());
        }
        let mut failures: Vec<StoreError> = Vec::new();

        // Ending the frame is timed by drain_encoder as Compress and Spill.
        if self.mode == Mode::Store {
            if let Err(e) = self.drain_encoder(true) {
                failures.push(e);
            }
        }

        let started = Instant::now();
        if self.mode == Mode::Store {
            if let Some(file) = self.file.as_mut() {
                match rewrite_dictionary_fields(file, self.dictionary.used(), self.dictionary.slot()) {
                    Ok(()) => self.counters.add_header((DICT_OFFSET - DICT_SIZE_OFFSET) as usize + MAX_DICTIONARY_SIZE),
                    Err(e) => failures.push(e.into()),
                }
                if let Err(e) = file.flush() {
                    failures.push(e.into());
                }
            }
        }

        // Engines first, then the dictionary they were primed from.
        self.encoder = None;
        self.decoder = None;
        self.dictionary = Dictionary::released();
        self.input.release();
        self.output.release();
        drop(self.file.take());

        self.timer.record_since(Stage::Close, started);

        let mut failures = failures.into_iter();
        let first = failures.next();
        for later in failures {
            warn!(error = %later, path = %self.path.display(), "additional failure while closing session");
        }
        match first {
            Some(e) => {
                warn!(error = %e, path = %self.path.display(), "session closed with errors");
                Err(e)
            }
            None => {
                info!(mode = %self.mode, path = %self.path.display(), payload = self.counters.bytes_payload, "session closed");
                Ok(())
            }
        }
    }

    // ---- shared guards ----

    pub(crate) fn ensure_mode(&self, required: Mode, op: &'static str) -> Result<(), SessionError> {
        if self.mode != required {
            return Err(SessionError::WrongMode { op, required, actual: self.mode });
        }
        Ok(())
    }

    pub(crate) fn ensure_usable(&self) -> Result<(), SessionError> {
        if self.file.is_none() {
            return Err(SessionError::Closed);
        }
        if self.poisoned {
            return Err(SessionError::Poisoned);
        }
        Ok(())
    }

    /// Poison the session when `result` carries an I/O or engine failure.
    pub(crate) fn track<T>(&mut self, op: &'static str, result: Result<T, StoreError>) -> Result<T, StoreError> {
        if let Err(e) = &result {
            if e.is_fatal() && !self.poisoned {
                self.poisoned = true;
                warn!(op, error = %e, path = %self.path.display(), "session poisoned");
            }
        }
        result
    }

    // ---- accessors ----

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Valid dictionary bytes; empty when none is bound.
    pub fn dictionary(&self) -> &[u8] {
        self.dictionary.as_bytes()
    }

    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    pub fn input_capacity(&self) -> usize {
        self.input.capacity()
    }

    pub fn output_capacity(&self) -> usize {
        self.output.capacity()
    }

    /// Decompressed bytes waiting in the output window (load mode).
    pub fn buffered_len(&self) -> usize {
        match self.mode {
            Mode::Load  => self.output.pending_len(),
            Mode::Store => 0,
        }
    }

    /// Payload bytes written so far (store mode).
    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    pub fn telemetry(&self) -> TelemetrySnapshot {
        TelemetrySnapshot::from(&self.counters, &self.timer)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.file.is_some() {
            if let Err(e) = self.finalize() {
                warn!(error = %e, path = %self.path.display(), "session dropped without close; finalisation failed");
            }
        }
    }
}

/// Close an optional session. `None` is a successful no-op.
pub fn close(session: Option<Session>) -> Result<Option<TelemetrySnapshot>, StoreError> {
    match session {
        Some(s) => s.close().map(Some),
        None => Ok(None),
    }
}
