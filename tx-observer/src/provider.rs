//! Capability traits for chain data sources.
//!
//! The scanner only needs two things from a chain: the current height and the
//! transactions in a given block. Anything that can answer both queries can
//! back a [`Scanner`](crate::scanner::Scanner), which keeps the JSON-RPC client
//! swappable for other backends and for in-memory fakes in tests.

use async_trait::async_trait;

use crate::{error::ChainResult, transaction::Transaction};

/// Source of the current chain height.
#[async_trait]
pub trait HeightProvider: Send + Sync {
    /// Get the number of the most recently produced block.
    async fn current_height(&self, request_id: u64) -> ChainResult<u64>;
}

/// Source of block contents.
#[async_trait]
pub trait BlockProvider: Send + Sync {
    /// Get the transactions in block `block_number`, in block order.
    ///
    /// A block without transactions yields an empty list, not an error.
    async fn block_transactions(
        &self,
        block_number: u64,
        request_id: u64,
    ) -> ChainResult<Vec<Transaction>>;
}

/// A chain that can answer both height and block queries.
pub trait ChainSource: HeightProvider + BlockProvider {}

impl<T> ChainSource for T where T: HeightProvider + BlockProvider {}

#[async_trait]
impl<T: HeightProvider + ?Sized> HeightProvider for std::sync::Arc<T> {
    async fn current_height(&self, request_id: u64) -> ChainResult<u64> {
        (**self).current_height(request_id).await
    }
}

#[async_trait]
impl<T: BlockProvider + ?Sized> BlockProvider for std::sync::Arc<T> {
    async fn block_transactions(
        &self,
        block_number: u64,
        request_id: u64,
    ) -> ChainResult<Vec<Transaction>> {
        (**self).block_transactions(block_number, request_id).await
    }
}
