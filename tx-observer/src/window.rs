//! Trailing block windows.
//!
//! A window is anchored at the chain height and extends backwards. It is
//! walked newest block first.

use serde::{Deserialize, Serialize};

/// A contiguous range of block numbers ending at `newest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BlockWindow {
    /// Newest (highest) block in the window
    pub newest: u64,

    /// Number of blocks in the window
    pub len: u64,

    /// Number of blocks the caller asked for
    pub requested: u64,
}

impl BlockWindow {
    /// Create the window of `range` blocks ending at `newest`.
    ///
    /// The window never extends below block 0, so it holds fewer than
    /// `range` blocks when `range > newest + 1`.
    pub fn new(newest: u64, range: u64) -> Self {
        let len = range.min(newest.saturating_add(1));
        if len < range {
            tracing::debug!(
                "Window of {} blocks truncated to {} at genesis",
                range,
                len
            );
        }

        Self {
            newest,
            len,
            requested: range,
        }
    }

    /// A window holding no blocks.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of blocks in the window.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Check if the window holds no blocks.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check if the window was cut short at genesis.
    pub fn is_truncated(&self) -> bool {
        self.len < self.requested
    }

    /// Oldest (lowest) block in the window.
    pub fn oldest(&self) -> Option<u64> {
        if self.is_empty() {
            None
        } else {
            Some(self.newest - (self.len - 1))
        }
    }

    /// Check whether a block number falls inside the window.
    pub fn contains(&self, number: u64) -> bool {
        match self.oldest() {
            Some(oldest) => (oldest..=self.newest).contains(&number),
            None => false,
        }
    }

    /// Block numbers in walk order, newest first.
    pub fn iter(&self) -> impl Iterator<Item = u64> {
        let newest = self.newest;
        (0..self.len).map(move |offset| newest - offset)
    }
}
