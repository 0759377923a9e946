//! Block format implementation for SSTable.
//!
//! A block contains multiple key-value entries and uses restart points
//! for efficient binary search and prefix compression.

use crate::comparator::Comparator;
use crate::config::Options;
use crate::error::Error;
use crate::sstable::iter::{BlockIter, BlockIterator};
use bytes::{Buf, Bytes};
use std::sync::Arc;

/// Size of one restart array slot and of the trailing restart count.
pub const RESTART_ENTRY_SIZE: usize = 4;

/// The bytes of a block, either owned by the block or borrowed from
/// whoever loaded them (a cache entry, a mapped file).
#[derive(Debug, Clone)]
pub enum BlockContents<'a> {
    /// Released when the last handle is dropped.
    Owned(Bytes),
    /// Lifetime managed by the caller.
    Borrowed(&'a [u8]),
}

impl<'a> BlockContents<'a> {
    /// The raw block bytes.
    pub fn data(&self) -> &[u8] {
        match self {
            BlockContents::Owned(bytes) => bytes.as_ref(),
            BlockContents::Borrowed(slice) => *slice,
        }
    }

    /// Whether the block owns its buffer.
    pub fn is_owned(&self) -> bool {
        matches!(self, BlockContents::Owned(_))
    }
}

impl From<Vec<u8>> for BlockContents<'static> {
    fn from(data: Vec<u8>) -> Self {
        BlockContents::Owned(Bytes::from(data))
    }
}

impl From<Bytes> for BlockContents<'static> {
    fn from(data: Bytes) -> Self {
        BlockContents::Owned(data)
    }
}

impl<'a> From<&'a [u8]> for BlockContents<'a> {
    fn from(data: &'a [u8]) -> Self {
        BlockContents::Borrowed(data)
    }
}

/// Block stores key-value pairs with prefix compression.
///
/// Format:
/// ```text
/// [Entry 1]
/// [Entry 2]
/// ...
/// [Entry N]
/// [Restart Point 1: u32]
/// [Restart Point 2: u32]
/// ...
/// [Restart Point M: u32]
/// [Num Restarts: u32]
/// ```
///
/// Every restart point is the offset of an entry that stores its full key
/// (`shared == 0`). See [`crate::sstable::entry`] for the entry layout.
///
/// A buffer whose trailer cannot be right is kept as an invalid block of
/// size zero; iterating it reports corruption.
#[derive(Debug, Clone)]
pub struct Block<'a> {
    contents: BlockContents<'a>,
    /// Logical size in bytes, 0 if the block is invalid
    size: usize,
    /// Offset of the restart array
    restart_offset: usize,
    num_restarts: u32,
}

impl<'a> Block<'a> {
    /// Create a new Block from raw data
    pub fn new(contents: impl Into<BlockContents<'a>>) -> Self {
        Self::with_options(contents, &Options::default())
    }

    /// Create a new Block, validating the restart array if
    /// `options.paranoid_checks` is set.
    pub fn with_options(contents: impl Into<BlockContents<'a>>, options: &Options) -> Self {
        let contents = contents.into();
        let data = contents.data();

        let geometry = Self::read_trailer(data).filter(|&(restart_offset, num_restarts)| {
            !options.paranoid_checks || Self::verify_restarts(data, restart_offset, num_restarts)
        });

        match geometry {
            Some((restart_offset, num_restarts)) => {
                let size = data.len();
                log::debug!("Opened block: {} bytes, {} restart points", size, num_restarts);
                Self { contents, size, restart_offset, num_restarts }
            }
            None => {
                log::warn!("Bad block contents: {} bytes", data.len());
                Self { contents, size: 0, restart_offset: 0, num_restarts: 0 }
            }
        }
    }

    /// Read the restart count and locate the restart array.
    fn read_trailer(data: &[u8]) -> Option<(usize, u32)> {
        if data.len() < RESTART_ENTRY_SIZE {
            return None;
        }

        let num_restarts = (&data[data.len() - RESTART_ENTRY_SIZE..]).get_u32_le();

        // How many restart slots fit in front of the count
        let max_restarts_allowed = (data.len() - RESTART_ENTRY_SIZE) / RESTART_ENTRY_SIZE;
        if num_restarts as usize > max_restarts_allowed {
            return None;
        }

        let restart_offset = data.len() - (num_restarts as usize + 1) * RESTART_ENTRY_SIZE;
        Some((restart_offset, num_restarts))
    }

    /// Restart offsets must start at 0, strictly increase, and stay inside
    /// the entry region.
    fn verify_restarts(data: &[u8], restart_offset: usize, num_restarts: u32) -> bool {
        let mut previous: Option<u32> = None;
        for index in 0..num_restarts as usize {
            let slot = restart_offset + index * RESTART_ENTRY_SIZE;
            let offset = (&data[slot..slot + RESTART_ENTRY_SIZE]).get_u32_le();

            let ordered = match previous {
                None => offset == 0,
                Some(prev) => offset > prev,
            };
            if !ordered || offset as usize >= restart_offset {
                log::warn!("Restart point {} has bad offset {}", index, offset);
                return false;
            }
            previous = Some(offset);
        }
        true
    }

    /// Logical size in bytes; 0 for an invalid block.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether the block passed construction-time validation.
    pub fn is_valid(&self) -> bool {
        self.size >= RESTART_ENTRY_SIZE
    }

    /// Get the number of restart points
    pub fn num_restarts(&self) -> u32 {
        self.num_restarts
    }

    /// Byte offset where the restart array begins.
    pub fn restart_offset(&self) -> usize {
        self.restart_offset
    }

    /// Get a restart point by index
    pub fn restart_point(&self, index: u32) -> Option<u32> {
        if index >= self.num_restarts {
            return None;
        }
        let slot = self.restart_offset + index as usize * RESTART_ENTRY_SIZE;
        Some((&self.data()[slot..slot + RESTART_ENTRY_SIZE]).get_u32_le())
    }

    /// Get the raw data
    pub fn data(&self) -> &[u8] {
        self.contents.data()
    }

    /// The underlying buffer and its ownership.
    pub fn contents(&self) -> &BlockContents<'a> {
        &self.contents
    }

    /// Create an iterator over the block ordered by `comparator`.
    ///
    /// An invalid block yields an iterator that is never valid and reports
    /// corruption; a block without restart points yields an empty iterator.
    pub fn new_iterator(&self, comparator: Arc<dyn Comparator>) -> BlockIterator<'_> {
        if !self.is_valid() {
            return BlockIterator::Error(Error::corruption("bad block contents"));
        }
        if self.num_restarts == 0 {
            return BlockIterator::Empty;
        }
        BlockIterator::Live(BlockIter::new(
            comparator,
            &self.data()[..self.size],
            self.restart_offset,
            self.num_restarts,
        ))
    }

    /// Create an iterator using the comparator from `options`.
    ///
    /// Options that fail [`Options::validate`] yield an iterator that is
    /// never valid and reports the validation error.
    pub fn iter(&self, options: &Options) -> BlockIterator<'_> {
        if let Err(e) = options.validate() {
            log::warn!("Rejecting block iterator options: {}", e);
            return BlockIterator::Error(e);
        }
        self.new_iterator(Arc::clone(&options.comparator))
    }
}
