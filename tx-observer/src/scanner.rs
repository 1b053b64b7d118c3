//! Windowed transaction scanner.
//!
//! This module walks a trailing window of blocks, newest first, and collects
//! the transactions touching one or more addresses. A block that fails to
//! load is logged and recorded in the report; it never aborts the walk. Only
//! a failure to resolve the chain height fails the scan as a whole.

use serde::{Serialize, Serializer};
use std::fmt::Display;

use crate::{
    error::{ChainError, ChainResult},
    provider::ChainSource,
    transaction::{Address, Transaction},
    window::BlockWindow,
};

/// Scanner over any [`ChainSource`].
///
/// The scanner keeps no history between calls, so a single instance can
/// serve concurrent scans.
pub struct Scanner<S> {
    /// Chain data source
    source: S,
}

impl<S: ChainSource> Scanner<S> {
    /// Create a scanner backed by `source`.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Get the underlying chain source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Get the current chain height from the source.
    pub async fn current_height(&self, request_id: u64) -> ChainResult<u64> {
        self.source.current_height(request_id).await
    }

    /// Scan the last `range_size` blocks for transactions touching `address`.
    ///
    /// A `range_size` of zero returns an empty report without querying the
    /// chain at all.
    pub async fn scan(
        &self,
        address: &Address,
        range_size: u64,
        request_id: u64,
    ) -> ChainResult<ScanReport> {
        let reports = self
            .scan_many(std::slice::from_ref(address), range_size, request_id)
            .await?;

        Ok(reports
            .into_iter()
            .next()
            .unwrap_or_else(|| ScanReport::new(address.clone(), None, BlockWindow::empty())))
    }

    /// Scan the last `range_size` blocks for several addresses at once.
    ///
    /// The height is resolved once and each block is fetched once, then
    /// filtered against every address. Reports come back in the order of
    /// `addresses`.
    pub async fn scan_many(
        &self,
        addresses: &[Address],
        range_size: u64,
        request_id: u64,
    ) -> ChainResult<Vec<ScanReport>> {
        if range_size == 0 || addresses.is_empty() {
            return Ok(addresses
                .iter()
                .map(|address| ScanReport::new(address.clone(), None, BlockWindow::empty()))
                .collect());
        }

        let height = self.source.current_height(request_id).await?;
        let window = BlockWindow::new(height, range_size);

        Ok(self.scan_window(addresses, height, window, request_id).await)
    }

    /// Walk `window` and filter each block against `addresses`.
    async fn scan_window(
        &self,
        addresses: &[Address],
        height: u64,
        window: BlockWindow,
        request_id: u64,
    ) -> Vec<ScanReport> {
        let start = std::time::Instant::now();

        tracing::debug!(
            "Scanning blocks {} down to {} for {} address(es)",
            window.newest,
            window.oldest().unwrap_or(window.newest),
            addresses.len()
        );

        let mut reports: Vec<ScanReport> = addresses
            .iter()
            .map(|address| ScanReport::new(address.clone(), Some(height), window))
            .collect();

        for block_number in window.iter() {
            let transactions = match self
                .source
                .block_transactions(block_number, request_id)
                .await
            {
                Ok(transactions) => transactions,
                Err(e) => {
                    tracing::warn!(
                        "Failed to fetch transactions for block {}: {}",
                        block_number,
                        e
                    );
                    for report in &mut reports {
                        report.record_failure(block_number, e.clone());
                    }
                    continue;
                }
            };

            tracing::debug!(
                "Block {}: {} transaction(s)",
                block_number,
                transactions.len()
            );

            for report in &mut reports {
                report.blocks_scanned += 1;
                report.transactions_scanned += transactions.len() as u64;
                let matches: Vec<Transaction> = transactions
                    .iter()
                    .filter(|tx| tx.touches(&report.address))
                    .cloned()
                    .collect();
                report.transactions.extend(matches);
            }
        }

        let elapsed = start.elapsed();
        for report in &reports {
            tracing::info!(
                "Scanned {} block(s) for {} in {:?}: {} match(es), {} failed block(s)",
                window.len(),
                report.address,
                elapsed,
                report.transactions.len(),
                report.failed_blocks.len()
            );
        }

        reports
    }
}

/// A block that could not be fetched during a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockFailure {
    /// Block number that failed
    pub block_number: u64,

    /// Why the fetch failed
    #[serde(serialize_with = "serialize_display")]
    pub error: ChainError,
}

/// Outcome of scanning a window for one address.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    /// Address the transactions were filtered against
    pub address: Address,

    /// Chain height the window was anchored at (`None` if never resolved)
    pub height: Option<u64>,

    /// Blocks covered by the scan
    pub window: BlockWindow,

    /// Matching transactions, newest block first
    pub transactions: Vec<Transaction>,

    /// Blocks that could not be fetched
    pub failed_blocks: Vec<BlockFailure>,

    /// Number of blocks fetched successfully
    pub blocks_scanned: u64,

    /// Number of transactions inspected across all fetched blocks
    pub transactions_scanned: u64,

    /// When the scan finished (RFC 3339)
    pub scanned_at: String,
}

impl ScanReport {
    /// Create an empty report for `address` over `window`.
    pub fn new(address: Address, height: Option<u64>, window: BlockWindow) -> Self {
        Self {
            address,
            height,
            window,
            transactions: Vec::new(),
            failed_blocks: Vec::new(),
            blocks_scanned: 0,
            transactions_scanned: 0,
            scanned_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    fn record_failure(&mut self, block_number: u64, error: ChainError) {
        self.failed_blocks.push(BlockFailure {
            block_number,
            error,
        });
    }

    /// Number of block fetches attempted.
    pub fn blocks_attempted(&self) -> u64 {
        self.blocks_scanned + self.failed_blocks.len() as u64
    }

    /// Check if every block in the window was fetched.
    pub fn is_complete(&self) -> bool {
        self.failed_blocks.is_empty()
    }

    /// Check if the window was non-empty and no block could be fetched.
    ///
    /// An empty transaction list from such a scan says nothing about the
    /// address.
    pub fn all_blocks_failed(&self) -> bool {
        !self.window.is_empty() && self.blocks_scanned == 0
    }

    /// Convert to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Convert to pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

fn serialize_display<T: Display, S: Serializer>(
    value: &T,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}
