//! Key ordering used by block iterators.

use std::cmp::Ordering;

/// A total order over keys.
///
/// Blocks are written in the order of some comparator and must be read back
/// with the same one; the block itself does not record which one was used.
pub trait Comparator: Send + Sync {
    /// Three-way comparison of two keys.
    fn compare(&self, a: &[u8], b: &[u8]) -> Ordering;

    /// Name of the ordering, used to detect mismatches.
    fn name(&self) -> &str;
}

/// Orders keys lexicographically by their raw bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct BytewiseComparator;

impl Comparator for BytewiseComparator {
    fn compare(&self, a: &[u8], b: &[u8]) -> Ordering {
        a.cmp(b)
    }

    fn name(&self) -> &str {
        "leveldb.BytewiseComparator"
    }
}
