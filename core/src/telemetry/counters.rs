//! telemetry/counters.rs
//! Mutable counters for one session.
//!
//! Summary: Byte and call counts collected by the read and write paths.
//! Converted into an immutable `TelemetrySnapshot` on demand and at close.
use std::ops::AddAssign;
use serde::{Serialize, Deserialize};

#[derive(Default, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionCounters {
    /// Uncompressed bytes delivered to (load) or accepted from (store) the caller.
    pub bytes_payload: u64,
    /// Compressed bytes read from (load) or written to (store) the file.
    pub bytes_compressed: u64,
    /// Header bytes read or written, including the close-time rewrite.
    pub bytes_header: u64,
    /// Payload bytes served from the output window without an engine call.
    pub bytes_from_cache: u64,
    pub engine_calls: u64,
    pub file_refills: u64,
    pub output_spills: u64,
    pub reads_immediate: u64,
    pub reads_buffered: u64,
    pub writes: u64,
}

impl SessionCounters {
    pub fn add_header(&mut self, len: usize) {
        self.bytes_header += len as u64;
    }

    /// One file read into the input staging buffer.
    pub fn add_refill(&mut self, fetched: usize) {
        self.file_refills += 1;
        self.bytes_compressed += fetched as u64;
    }

    /// One spill of the output staging buffer to the file.
    pub fn add_spill(&mut self, written: usize) {
        self.output_spills += 1;
        self.bytes_compressed += written as u64;
    }

    pub fn add_engine_call(&mut self) {
        self.engine_calls += 1;
    }

    pub fn add_cache_hit(&mut self, len: usize) {
        self.bytes_from_cache += len as u64;
    }

    /// One completed read call.
    pub fn add_read(&mut self, len: usize, immediate: bool) {
        if immediate {
            self.reads_immediate += 1;
        } else {
            self.reads_buffered += 1;
        }
        self.bytes_payload += len as u64;
    }

    /// One completed write call.
    pub fn add_write(&mut self, len: usize) {
        self.writes += 1;
        self.bytes_payload += len as u64;
    }

    pub fn merge(&mut self, other: &SessionCounters) {
        self.bytes_payload += other.bytes_payload;
        self.bytes_compressed += other.bytes_compressed;
        self.bytes_header += other.bytes_header;
        self.bytes_from_cache += other.bytes_from_cache;
        self.engine_calls += other.engine_calls;
        self.file_refills += other.file_refills;
        self.output_spills += other.output_spills;
        self.reads_immediate += other.reads_immediate;
        self.reads_buffered += other.reads_buffered;
        self.writes += other.writes;
    }
}

impl AddAssign for SessionCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.merge(&rhs);
    }
}
