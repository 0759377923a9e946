//! SSTable data block reader.
//!
//! A data block is the unit the table layer reads from disk or cache. Its
//! bytes arrive here already checksummed and decompressed; this module only
//! decodes and navigates them.
//!
//! ## Block Format
//!
//! ```text
//! [Entry 1]
//! ...
//! [Entry N]
//! [Restart Points: u32 * M]  // Offsets of entries storing a full key
//! [Num Restarts: u32]
//! ```
//!
//! Keys are prefix compressed against the previous key, except at restart
//! points. Seeking binary searches the restart points, then scans forward
//! within one restart region.

pub mod block;
pub mod entry;
pub mod iter;

#[cfg(test)]
pub(crate) mod testutil;

pub use block::{Block, BlockContents};
pub use entry::{decode_entry, EntryHeader};
pub use iter::{BlockIter, BlockIterator};
