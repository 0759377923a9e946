//! Configuration options for reading blocks.

use std::fmt;
use std::sync::Arc;

use crate::comparator::{BytewiseComparator, Comparator};

/// Options controlling how a block is validated and iterated.
#[derive(Clone)]
pub struct Options {
    /// Ordering the block's keys were written in.
    /// Default: BytewiseComparator
    pub comparator: Arc<dyn Comparator>,

    /// Verify the restart array when a block is constructed.
    /// Offsets must start at 0, strictly increase, and stay below the
    /// restart array. Costs one pass over the restart array per block.
    /// Default: false
    pub paranoid_checks: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self { comparator: Arc::new(BytewiseComparator), paranoid_checks: false }
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("comparator", &self.comparator.name())
            .field("paranoid_checks", &self.paranoid_checks)
            .finish()
    }
}

impl Options {
    /// Creates a new Options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the key ordering.
    pub fn comparator(mut self, comparator: Arc<dyn Comparator>) -> Self {
        self.comparator = comparator;
        self
    }

    /// Enables or disables restart array verification.
    pub fn paranoid_checks(mut self, value: bool) -> Self {
        self.paranoid_checks = value;
        self
    }

    /// Validates the options and returns an error if any are invalid.
    pub fn validate(&self) -> crate::Result<()> {
        if self.comparator.name().is_empty() {
            return Err(crate::Error::invalid_argument("comparator name must not be empty"));
        }
        Ok(())
    }
}
