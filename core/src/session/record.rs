//! session/record.rs
//! Mode-symmetric records: the same call writes in store mode and reads in
//! load mode, so one routine can both save and restore a structure.

use bytemuck::Pod;

use crate::session::context::Session;
use crate::session::types::{Mode, SessionError};
use crate::types::StoreError;

impl Session {
    /// Store: write `data`. Load: fill `data` (via `read_draining`, so record
    /// sizes need not respect the output capacity threshold).
    pub fn record(&mut self, data: &mut [u8]) -> Result<(), StoreError> {
        match self.mode {
            Mode::Store => self.write(data),
            Mode::Load  => self.read_draining(data),
        }
    }

    /// Length-prefixed byte record (native-endian `u64` length).
    ///
    /// Load replaces the contents of `data` with the stored bytes.
    pub fn record_heap(&mut self, data: &mut Vec<u8>) -> Result<(), StoreError> {
        let mut len = data.len() as u64;
        self.record_value(&mut len)?;
        if self.mode == Mode::Load {
            let len = usize::try_from(len).map_err(|_| {
                SessionError::InvalidArgument(format!("stored record length {len} exceeds address space"))
            })?;
            data.clear();
            data.resize(len, 0);
        }
        self.record(data)
    }

    /// One plain value, in native byte order.
    pub fn record_value<T: Pod>(&mut self, value: &mut T) -> Result<(), StoreError> {
        self.record(bytemuck::bytes_of_mut(value))
    }

    /// A slice of plain values, in native byte order.
    pub fn record_slice<T: Pod>(&mut self, values: &mut [T]) -> Result<(), StoreError> {
        self.record(bytemuck::cast_slice_mut(values))
    }
}
