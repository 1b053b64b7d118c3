//! In-memory chain source for unit tests.

use async_trait::async_trait;
use std::{collections::HashMap, sync::Mutex};

use crate::{
    error::{ChainError, ChainResult},
    provider::{BlockProvider, HeightProvider},
    transaction::Transaction,
};

/// A chain with a fixed height and canned block contents.
///
/// Blocks that were never configured are served as empty. Every query is
/// recorded so tests can assert on the exact call sequence.
pub struct StaticChain {
    height: Result<u64, ChainError>,
    blocks: HashMap<u64, Result<Vec<Transaction>, ChainError>>,
    height_requests: Mutex<usize>,
    block_requests: Mutex<Vec<u64>>,
    request_ids: Mutex<Vec<u64>>,
}

impl StaticChain {
    pub fn new(height: u64) -> Self {
        Self::with_height(Ok(height))
    }

    pub fn failing_height(error: ChainError) -> Self {
        Self::with_height(Err(error))
    }

    fn with_height(height: Result<u64, ChainError>) -> Self {
        Self {
            height,
            blocks: HashMap::new(),
            height_requests: Mutex::new(0),
            block_requests: Mutex::new(Vec::new()),
            request_ids: Mutex::new(Vec::new()),
        }
    }

    pub fn with_block(mut self, number: u64, transactions: Vec<Transaction>) -> Self {
        self.blocks.insert(number, Ok(transactions));
        self
    }

    pub fn with_failure(mut self, number: u64, error: ChainError) -> Self {
        self.blocks.insert(number, Err(error));
        self
    }

    pub fn height_requests(&self) -> usize {
        *self.height_requests.lock().unwrap()
    }

    pub fn block_requests(&self) -> Vec<u64> {
        self.block_requests.lock().unwrap().clone()
    }

    pub fn request_ids(&self) -> Vec<u64> {
        self.request_ids.lock().unwrap().clone()
    }
}

#[async_trait]
impl HeightProvider for StaticChain {
    async fn current_height(&self, request_id: u64) -> ChainResult<u64> {
        *self.height_requests.lock().unwrap() += 1;
        self.request_ids.lock().unwrap().push(request_id);
        self.height.clone()
    }
}

#[async_trait]
impl BlockProvider for StaticChain {
    async fn block_transactions(
        &self,
        block_number: u64,
        request_id: u64,
    ) -> ChainResult<Vec<Transaction>> {
        self.block_requests.lock().unwrap().push(block_number);
        self.request_ids.lock().unwrap().push(request_id);
        self.blocks
            .get(&block_number)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}
