// Shared helpers for integration tests: a reference block encoder

#![allow(dead_code)]

use bytes::{BufMut, BytesMut};
use integer_encoding::VarInt;

/// BlockBuilder builds a block with prefix compression.
///
/// Lengths use the one-byte header when all three fit below 128, varints
/// otherwise. Every `restart_interval` entries a full key is stored and its
/// offset recorded as a restart point.
pub struct BlockBuilder {
    buffer: BytesMut,
    restarts: Vec<u32>,
    counter: usize,
    /// None until the first key is added
    last_key: Option<Vec<u8>>,
    restart_interval: usize,
}

impl BlockBuilder {
    pub fn new(restart_interval: usize) -> Self {
        assert!(restart_interval > 0, "Restart interval must be positive");
        Self {
            buffer: BytesMut::new(),
            restarts: vec![0],
            counter: 0,
            last_key: None,
            restart_interval,
        }
    }

    /// Add a key-value pair; keys must arrive in strictly increasing order.
    pub fn add(&mut self, key: &[u8], value: &[u8]) {
        let mut shared = 0;
        if let Some(last_key) = &self.last_key {
            assert!(key > last_key.as_slice(), "Keys must be added in sorted order");
            if self.counter < self.restart_interval {
                shared = shared_prefix_len(last_key, key);
            }
        }
        if self.counter >= self.restart_interval {
            self.restarts.push(self.buffer.len() as u32);
            self.counter = 0;
        }

        let non_shared = key.len() - shared;
        let lengths = [shared as u32, non_shared as u32, value.len() as u32];
        if lengths.iter().fold(0, |acc, len| acc | len) < 128 {
            for len in lengths {
                self.buffer.put_u8(len as u8);
            }
        } else {
            for len in lengths {
                self.buffer.put_slice(&len.encode_var_vec());
            }
        }
        self.buffer.put_slice(&key[shared..]);
        self.buffer.put_slice(value);

        self.last_key = Some(key.to_vec());
        self.counter += 1;
    }

    /// Finish building and return the block data
    pub fn finish(mut self) -> Vec<u8> {
        for restart in &self.restarts {
            self.buffer.put_u32_le(*restart);
        }
        self.buffer.put_u32_le(self.restarts.len() as u32);
        self.buffer.to_vec()
    }
}

fn shared_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

/// Encode sorted entries into a block.
pub fn build_block(entries: &[(Vec<u8>, Vec<u8>)], restart_interval: usize) -> Vec<u8> {
    let mut builder = BlockBuilder::new(restart_interval);
    for (key, value) in entries {
        builder.add(key, value);
    }
    builder.finish()
}

/// `count` entries with zero-padded keys so that prefixes are shared.
pub fn numbered_entries(count: usize) -> Vec<(Vec<u8>, Vec<u8>)> {
    (0..count)
        .map(|i| (format!("key{:08}", i).into_bytes(), format!("value{:08}", i).into_bytes()))
        .collect()
}

pub fn init_logger() {
    env_logger::builder().is_test(true).try_init().ok();
}
