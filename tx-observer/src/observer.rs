//! Observer facade tying the registry to the scanner.

use std::sync::Arc;

use crate::{
    error::ChainResult,
    provider::ChainSource,
    registry::SubscriptionRegistry,
    scanner::{ScanReport, Scanner},
    transaction::Address,
};

/// Watches subscribed addresses on a chain.
pub struct Observer<S> {
    scanner: Scanner<S>,
    registry: Arc<dyn SubscriptionRegistry>,
}

impl<S: ChainSource> Observer<S> {
    /// Create an observer over `source`, sharing `registry` with the caller.
    pub fn new(source: S, registry: Arc<dyn SubscriptionRegistry>) -> Self {
        Self {
            scanner: Scanner::new(source),
            registry,
        }
    }

    /// Get the scanner.
    pub fn scanner(&self) -> &Scanner<S> {
        &self.scanner
    }

    /// Get the registry.
    pub fn registry(&self) -> &Arc<dyn SubscriptionRegistry> {
        &self.registry
    }

    /// Subscribe to `address`. Returns `true` if it was newly added.
    pub fn subscribe(&self, address: impl Into<Address>) -> bool {
        let address = address.into();
        let added = self.registry.subscribe(address.clone());
        if added {
            tracing::info!("Subscribed to address: {}", address);
        } else {
            tracing::warn!("Address {} is already subscribed", address);
        }
        added
    }

    /// List subscribed addresses.
    pub fn subscribed(&self) -> Vec<Address> {
        self.registry.list_subscribed()
    }

    /// Get the current chain height.
    pub async fn current_block(&self, request_id: u64) -> ChainResult<u64> {
        self.scanner.current_height(request_id).await
    }

    /// Scan the last `range_size` blocks for transactions touching `address`.
    ///
    /// The address does not need to be subscribed.
    pub async fn transactions(
        &self,
        address: &Address,
        range_size: u64,
        request_id: u64,
    ) -> ChainResult<ScanReport> {
        self.scanner.scan(address, range_size, request_id).await
    }

    /// Scan the last `range_size` blocks for every subscribed address.
    ///
    /// The registry is read once up front; addresses subscribed while the
    /// scan runs are picked up by the next call.
    pub async fn scan_subscribed(
        &self,
        range_size: u64,
        request_id: u64,
    ) -> ChainResult<Vec<ScanReport>> {
        let addresses = self.registry.list_subscribed();
        if addresses.is_empty() {
            tracing::info!("No subscribed addresses to scan");
            return Ok(Vec::new());
        }

        self.scanner
            .scan_many(&addresses, range_size, request_id)
            .await
    }
}
