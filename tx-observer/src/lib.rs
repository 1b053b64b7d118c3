//! Transaction Observer
//!
//! Watches a set of subscribed addresses on an Ethereum-style chain and, on
//! demand, scans a trailing window of blocks for transactions touching them.
//!
//! # Architecture
//!
//! The [`RpcClient`] talks JSON-RPC to a chain node and answers two queries:
//! the current height (`eth_blockNumber`) and the transactions in a block
//! (`eth_getBlockByNumber`). The [`Scanner`] resolves the height once, walks
//! the window newest block first, and filters every block by `from`/`to`.
//!
//! A block that fails to load is logged and listed in the [`ScanReport`]
//! instead of aborting the scan, so callers can tell "no matches" apart from
//! "nothing could be fetched". Only a failed height lookup fails a scan.
//!
//! The scanner depends on the [`provider`] traits rather than on the RPC
//! client, and the [`Observer`] takes its [`SubscriptionRegistry`] by
//! injection, so either side can be swapped out.

pub mod config;
pub mod error;
pub mod observer;
pub mod output;
pub mod provider;
pub mod registry;
pub mod rpc;
pub mod scanner;
pub mod transaction;
pub mod window;

#[cfg(test)]
mod test_utils;

pub use config::{ObserverConfig, OutputFormat};
pub use error::{ChainError, ChainResult};
pub use observer::Observer;
pub use provider::{BlockProvider, ChainSource, HeightProvider};
pub use registry::{MemoryRegistry, SubscriptionRegistry};
pub use rpc::RpcClient;
pub use scanner::{BlockFailure, ScanReport, Scanner};
pub use transaction::{Address, Transaction};
pub use window::BlockWindow;
