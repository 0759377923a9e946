//! Hand-assembled blocks for unit tests.
//!
//! Entries are written exactly as given, so tests can produce blocks that a
//! real builder never would.

use bytes::BufMut;
use integer_encoding::VarInt;

pub(crate) struct RawBlock {
    buffer: Vec<u8>,
    restarts: Vec<u32>,
}

impl RawBlock {
    pub(crate) fn new() -> Self {
        Self { buffer: Vec::new(), restarts: vec![0] }
    }

    /// Append an entry with an explicit shared length.
    pub(crate) fn entry(mut self, shared: u32, suffix: &[u8], value: &[u8]) -> Self {
        let (non_shared, value_len) = (suffix.len() as u32, value.len() as u32);
        if (shared | non_shared | value_len) < 128 {
            self.buffer.put_u8(shared as u8);
            self.buffer.put_u8(non_shared as u8);
            self.buffer.put_u8(value_len as u8);
        } else {
            self.buffer.put_slice(&shared.encode_var_vec());
            self.buffer.put_slice(&non_shared.encode_var_vec());
            self.buffer.put_slice(&value_len.encode_var_vec());
        }
        self.buffer.put_slice(suffix);
        self.buffer.put_slice(value);
        self
    }

    /// Append raw bytes to the entry region.
    pub(crate) fn raw(mut self, bytes: &[u8]) -> Self {
        self.buffer.put_slice(bytes);
        self
    }

    /// Make the next entry a restart point.
    pub(crate) fn restart(mut self) -> Self {
        self.restarts.push(self.buffer.len() as u32);
        self
    }

    pub(crate) fn finish(self) -> Vec<u8> {
        let restarts = self.restarts.clone();
        self.finish_with_restarts(&restarts)
    }

    /// Write the given restart array instead of the recorded one.
    pub(crate) fn finish_with_restarts(mut self, restarts: &[u32]) -> Vec<u8> {
        for restart in restarts {
            self.buffer.put_u32_le(*restart);
        }
        self.buffer.put_u32_le(restarts.len() as u32);
        self.buffer
    }
}
