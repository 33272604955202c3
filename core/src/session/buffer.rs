//! session/buffer.rs
//! Fixed-capacity staging buffer with a `[pos, used)` window.
//!
//! Invariant: `pos <= used <= capacity`. Bytes before `pos` are consumed and
//! may be overwritten; bytes in `[pos, used)` are pending.

use std::io::{self, ErrorKind, Read, Write};

pub struct StagingBuffer {
    bytes: Box<[u8]>,
    pos: usize,
    used: usize,
}

impl StagingBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { bytes: vec![0u8; capacity].into_boxed_slice(), pos: 0, used: 0 }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn used(&self) -> usize {
        self.used
    }

    #[inline]
    pub fn pending_len(&self) -> usize {
        self.used - self.pos
    }

    #[inline]
    pub fn is_drained(&self) -> bool {
        self.pos >= self.used
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.used == self.bytes.len()
    }

    /// Pending window `[pos, used)`.
    #[inline]
    pub fn pending(&self) -> &[u8] {
        &self.bytes[self.pos..self.used]
    }

    /// Mark `n` pending bytes as consumed.
    #[inline]
    pub fn consume(&mut self, n: usize) {
        debug_assert!(n <= self.pending_len(), "consume {} > pending {}", n, self.pending_len());
        self.pos += n;
    }

    /// Slide the pending tail to offset 0, reclaiming the consumed prefix.
    pub fn compact(&mut self) {
        if self.pos < self.used {
            self.bytes.copy_within(self.pos..self.used, 0);
            self.used -= self.pos;
        } else {
            self.used = 0;
        }
        self.pos = 0;
        self.check();
    }

    /// Fill the free tail from `r` until full or EOF. Returns bytes fetched.
    pub fn refill_from<R: Read + ?Sized>(&mut self, r: &mut R) -> io::Result<usize> {
        let mut fetched = 0;
        while self.used < self.bytes.len() {
            match r.read(&mut self.bytes[self.used..]) {
                Ok(0) => break,
                Ok(n) => {
                    self.used += n;
                    fetched += n;
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        self.check();
        Ok(fetched)
    }

    /// Whole buffer as an engine target; follow with `reset_window`.
    #[inline]
    pub fn whole_mut(&mut self) -> &mut [u8] {
        &mut self.bytes[..]
    }

    /// Window becomes `[0, used)` after the buffer was refilled from offset 0.
    pub fn reset_window(&mut self, used: usize) {
        debug_assert!(used <= self.bytes.len());
        self.pos = 0;
        self.used = used;
    }

    /// Copy as much of the pending window as fits into `dst`, consuming it.
    pub fn drain_into(&mut self, dst: &mut [u8]) -> usize {
        let n = self.pending_len().min(dst.len());
        dst[..n].copy_from_slice(&self.bytes[self.pos..self.pos + n]);
        self.pos += n;
        n
    }

    /// Free tail `[used, capacity)` for an engine to write into; follow with `commit`.
    #[inline]
    pub fn spare_mut(&mut self) -> &mut [u8] {
        &mut self.bytes[self.used..]
    }

    #[inline]
    pub fn commit(&mut self, n: usize) {
        debug_assert!(self.used + n <= self.bytes.len());
        self.used += n;
    }

    /// Write the pending window to `w` and empty the buffer. Returns bytes written.
    pub fn spill_to<W: Write + ?Sized>(&mut self, w: &mut W) -> io::Result<usize> {
        let n = self.pending_len();
        if n > 0 {
            w.write_all(&self.bytes[self.pos..self.used])?;
        }
        self.clear();
        Ok(n)
    }

    pub fn clear(&mut self) {
        self.pos = 0;
        self.used = 0;
    }

    /// Drop the backing memory. Only used at teardown.
    pub fn release(&mut self) {
        self.bytes = Box::default();
        self.clear();
    }

    #[inline]
    fn check(&self) {
        debug_assert!(self.pos <= self.used && self.used <= self.bytes.len());
    }
}
