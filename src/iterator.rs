//! Iterator interface for scanning key-value pairs.
//!
//! Block iterators implement [`KvIterator`] so that a higher-level merging
//! iterator can drive many blocks through one interface.

use crate::Result;

/// A positioned cursor over sorted key-value pairs.
///
/// A fresh iterator is not positioned; call one of the seek methods or
/// `next` first.
///
/// # Example
///
/// ```rust
/// use aidb_block::{Block, KvIterator, Options};
///
/// // A block holding no entries: just a zero restart count
/// let block = Block::new(vec![0u8, 0, 0, 0]);
/// let mut iter = block.iter(&Options::default());
///
/// iter.seek_to_first();
/// while iter.valid() {
///     println!("{:?} => {:?}", iter.key(), iter.value());
///     iter.next();
/// }
/// assert!(iter.status().is_ok());
/// ```
pub trait KvIterator {
    /// Returns true if the iterator is positioned at an entry.
    fn valid(&self) -> bool;

    /// Position at the first entry.
    fn seek_to_first(&mut self);

    /// Position at the last entry.
    fn seek_to_last(&mut self);

    /// Position at the first entry whose key is not less than `target`.
    fn seek(&mut self, target: &[u8]);

    /// Move to the next entry.
    ///
    /// A freshly created iterator moves to its first entry; one that ran off
    /// the end stays there.
    fn next(&mut self);

    /// Move to the previous entry. Requires `valid()`.
    fn prev(&mut self);

    /// Returns the key at the current position.
    ///
    /// # Panics
    ///
    /// Panics if the iterator is not valid.
    fn key(&self) -> &[u8];

    /// Returns the value at the current position.
    ///
    /// # Panics
    ///
    /// Panics if the iterator is not valid.
    fn value(&self) -> &[u8];

    /// Ok unless the iterator ran into corrupted data.
    ///
    /// Check this when `valid()` turns false to tell the end of the data
    /// apart from a failure.
    fn status(&self) -> Result<()>;
}

/// Drains `iter` from the first entry, returning every pair in order.
///
/// Fails with the iterator's status if the scan stopped on corruption.
pub fn collect_entries<I: KvIterator + ?Sized>(iter: &mut I) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
    let mut entries = Vec::new();
    iter.seek_to_first();
    while iter.valid() {
        entries.push((iter.key().to_vec(), iter.value().to_vec()));
        iter.next();
    }
    iter.status()?;
    Ok(entries)
}
