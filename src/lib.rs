//! # AiDb Block - SSTable data block reader
//!
//! Decodes and iterates the prefix-compressed data blocks stored inside
//! AiDb's sorted string tables.
//!
//! ## Architecture
//!
//! - **Entry codec** ([`sstable::entry`]): decodes one entry header with
//!   strict bounds checks
//! - **Block** ([`Block`]): validates a raw buffer and locates its restart array
//! - **Block iterator** ([`BlockIterator`]): forward and backward scans and
//!   seeks, using the restart array for binary search
//!
//! Corruption never panics or reads out of bounds. A malformed block yields
//! an iterator that is never valid, and a malformed entry makes the iterator
//! invalid with a corruption status.
//!
//! ## Example Usage
//!
//! ```rust
//! use aidb_block::{Block, KvIterator, Options};
//!
//! # fn main() -> Result<(), aidb_block::Error> {
//! // Two entries, "apple" -> "red" and "apricot" -> "orange",
//! // with a single restart point at offset 0
//! let mut data = vec![0, 5, 3];
//! data.extend_from_slice(b"applered");
//! data.extend_from_slice(&[2, 5, 6]);
//! data.extend_from_slice(b"ricotorange");
//! data.extend_from_slice(&0u32.to_le_bytes());
//! data.extend_from_slice(&1u32.to_le_bytes());
//!
//! let block = Block::new(data);
//! let mut iter = block.iter(&Options::default());
//!
//! iter.seek(b"apr");
//! assert_eq!(iter.key(), b"apricot");
//! assert_eq!(iter.value(), b"orange");
//! iter.status()?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

// Module declarations
pub mod comparator;
pub mod config;
pub mod error;
pub mod iterator;
pub mod sstable;

// Re-exports
pub use comparator::{BytewiseComparator, Comparator};
pub use config::Options;
pub use error::{Error, Result};
pub use iterator::{collect_entries, KvIterator};
pub use sstable::{Block, BlockContents, BlockIter, BlockIterator};
