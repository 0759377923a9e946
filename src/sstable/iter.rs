//! Iterators over the entries of a block.

use crate::comparator::Comparator;
use crate::error::{Error, Result};
use crate::iterator::KvIterator;
use crate::sstable::block::RESTART_ENTRY_SIZE;
use crate::sstable::entry::decode_entry;
use bytes::Buf;
use std::cmp::Ordering;
use std::sync::Arc;

/// Cursor over a well-formed block with at least one restart point.
///
/// Keys are rebuilt into an owned buffer as entries are parsed; values are
/// slices of the block. Entries can only be decoded front to back, so moving
/// backwards rescans from the closest restart point in front of the cursor.
pub struct BlockIter<'b> {
    comparator: Arc<dyn Comparator>,
    data: &'b [u8],
    /// Offset of the restart array, also the end of the entries
    restarts: usize,
    num_restarts: u32,

    /// Offset of the current entry; >= restarts if not valid
    current: usize,
    /// Restart region the current entry falls in
    restart_index: u32,
    key: Vec<u8>,
    value_offset: usize,
    value_len: usize,
    status: Result<()>,
}

impl<'b> BlockIter<'b> {
    /// Create an iterator parked in front of the first restart point.
    ///
    /// It is not valid until positioned; `next` moves it to the first entry.
    /// `data` must hold the whole block, with `num_restarts > 0` restart
    /// slots starting at `restarts`.
    pub(crate) fn new(
        comparator: Arc<dyn Comparator>,
        data: &'b [u8],
        restarts: usize,
        num_restarts: u32,
    ) -> Self {
        debug_assert!(num_restarts > 0);
        debug_assert_eq!(
            restarts + (num_restarts as usize + 1) * RESTART_ENTRY_SIZE,
            data.len()
        );
        let mut iter = Self {
            comparator,
            data,
            restarts,
            num_restarts,
            current: restarts,
            restart_index: 0,
            key: Vec::new(),
            value_offset: restarts,
            value_len: 0,
            status: Ok(()),
        };
        iter.seek_to_restart_point(0);
        iter
    }

    /// Index of the restart region the cursor is in.
    pub fn restart_index(&self) -> u32 {
        self.restart_index
    }

    /// Offset just past the current entry.
    fn next_entry_offset(&self) -> usize {
        self.value_offset + self.value_len
    }

    fn restart_point(&self, index: u32) -> usize {
        debug_assert!(index < self.num_restarts);
        let slot = self.restarts + index as usize * RESTART_ENTRY_SIZE;
        (&self.data[slot..slot + RESTART_ENTRY_SIZE]).get_u32_le() as usize
    }

    /// Park before the entry at restart point `index`; the following
    /// `parse_next_entry` decodes it.
    fn seek_to_restart_point(&mut self, index: u32) {
        self.key.clear();
        self.restart_index = index;
        self.value_offset = self.restart_point(index);
        self.value_len = 0;
    }

    fn mark_exhausted(&mut self) {
        self.current = self.restarts;
        self.restart_index = self.num_restarts;
        self.value_offset = self.restarts;
        self.value_len = 0;
    }

    fn corruption_error(&mut self) {
        log::warn!("Bad entry in block at offset {}", self.current);
        self.mark_exhausted();
        self.status = Err(Error::corruption("bad entry in block"));
        self.key.clear();
    }

    /// Decode the entry following the current one.
    ///
    /// Returns false at the end of the entries or on corruption.
    fn parse_next_entry(&mut self) -> bool {
        self.current = self.next_entry_offset();
        if self.current >= self.restarts {
            self.mark_exhausted();
            return false;
        }

        let header = match decode_entry(self.data, self.current, self.restarts) {
            Some(header) if header.shared as usize <= self.key.len() => header,
            _ => {
                self.corruption_error();
                return false;
            }
        };

        self.key.truncate(header.shared as usize);
        self.key.extend_from_slice(&self.data[header.key_offset..header.value_offset()]);
        self.value_offset = header.value_offset();
        self.value_len = header.value_len as usize;

        while self.restart_index + 1 < self.num_restarts
            && self.restart_point(self.restart_index + 1) <= self.current
        {
            self.restart_index += 1;
        }
        true
    }

    fn is_corrupted(&self) -> bool {
        self.status.is_err()
    }
}

impl KvIterator for BlockIter<'_> {
    fn valid(&self) -> bool {
        self.current < self.restarts
    }

    fn seek_to_first(&mut self) {
        if self.is_corrupted() {
            return;
        }
        self.seek_to_restart_point(0);
        self.parse_next_entry();
    }

    fn seek_to_last(&mut self) {
        if self.is_corrupted() {
            return;
        }
        self.seek_to_restart_point(self.num_restarts - 1);
        while self.parse_next_entry() && self.next_entry_offset() < self.restarts {
            // Keep skipping
        }
    }

    fn seek(&mut self, target: &[u8]) {
        if self.is_corrupted() {
            return;
        }

        // Binary search for the last restart point with a key < target
        let mut left = 0;
        let mut right = self.num_restarts - 1;
        let mut current_key_compare = Ordering::Equal;

        if self.valid() {
            // Start from the current position when it bounds the target
            current_key_compare = self.comparator.compare(&self.key, target);
            match current_key_compare {
                Ordering::Less => left = self.restart_index,
                Ordering::Greater => right = self.restart_index,
                Ordering::Equal => return,
            }
        }

        let data = self.data;
        while left < right {
            let mid = (left + right + 1) / 2;
            let region_offset = self.restart_point(mid);
            let header = match decode_entry(data, region_offset, self.restarts) {
                Some(header) if header.shared == 0 => header,
                _ => {
                    self.current = region_offset;
                    self.corruption_error();
                    return;
                }
            };

            let mid_key = &data[header.key_offset..header.value_offset()];
            if self.comparator.compare(mid_key, target) == Ordering::Less {
                left = mid;
            } else {
                right = mid - 1;
            }
        }

        // Keep scanning from the current entry if it is already in the
        // right region and before the target
        let skip_seek = left == self.restart_index && current_key_compare == Ordering::Less;
        if !skip_seek {
            self.seek_to_restart_point(left);
        }

        while self.parse_next_entry() {
            if self.comparator.compare(&self.key, target) != Ordering::Less {
                return;
            }
        }
    }

    fn next(&mut self) {
        // An exhausted iterator parses nothing: its next offset is the
        // restart array
        if self.is_corrupted() {
            return;
        }
        self.parse_next_entry();
    }

    fn prev(&mut self) {
        if !self.valid() {
            return;
        }

        // Find the last restart point strictly before the current entry
        let original = self.current;
        while self.restart_point(self.restart_index) >= original {
            if self.restart_index == 0 {
                // No more entries
                self.mark_exhausted();
                return;
            }
            self.restart_index -= 1;
        }

        self.seek_to_restart_point(self.restart_index);
        while self.parse_next_entry() && self.next_entry_offset() < original {
            // Walk up to the entry just before the original one
        }

        // Entries decoded from a restart point must end exactly where the
        // original entry starts
        if self.valid() && self.next_entry_offset() != original {
            self.corruption_error();
        }
    }

    fn key(&self) -> &[u8] {
        assert!(self.valid(), "Iterator not valid");
        &self.key
    }

    fn value(&self) -> &[u8] {
        assert!(self.valid(), "Iterator not valid");
        &self.data[self.value_offset..self.value_offset + self.value_len]
    }

    fn status(&self) -> Result<()> {
        self.status.clone()
    }
}

/// Iterator handed out by [`crate::sstable::Block::new_iterator`].
///
/// Blocks that cannot be read still produce an iterator, one that is never
/// valid. Which kind is decided once, when the iterator is created.
pub enum BlockIterator<'b> {
    /// Iterates a well-formed block.
    Live(BlockIter<'b>),
    /// Never valid; reports the error as its status.
    Error(Error),
    /// Never valid; a block without entries.
    Empty,
}

impl KvIterator for BlockIterator<'_> {
    fn valid(&self) -> bool {
        match self {
            BlockIterator::Live(iter) => iter.valid(),
            BlockIterator::Error(_) | BlockIterator::Empty => false,
        }
    }

    fn seek_to_first(&mut self) {
        if let BlockIterator::Live(iter) = self {
            iter.seek_to_first();
        }
    }

    fn seek_to_last(&mut self) {
        if let BlockIterator::Live(iter) = self {
            iter.seek_to_last();
        }
    }

    fn seek(&mut self, target: &[u8]) {
        if let BlockIterator::Live(iter) = self {
            iter.seek(target);
        }
    }

    fn next(&mut self) {
        if let BlockIterator::Live(iter) = self {
            iter.next();
        }
    }

    fn prev(&mut self) {
        if let BlockIterator::Live(iter) = self {
            iter.prev();
        }
    }

    fn key(&self) -> &[u8] {
        match self {
            BlockIterator::Live(iter) => iter.key(),
            BlockIterator::Error(_) | BlockIterator::Empty => panic!("Iterator not valid"),
        }
    }

    fn value(&self) -> &[u8] {
        match self {
            BlockIterator::Live(iter) => iter.value(),
            BlockIterator::Error(_) | BlockIterator::Empty => panic!("Iterator not valid"),
        }
    }

    fn status(&self) -> Result<()> {
        match self {
            BlockIterator::Live(iter) => iter.status(),
            BlockIterator::Error(err) => Err(err.clone()),
            BlockIterator::Empty => Ok(()),
        }
    }
}
