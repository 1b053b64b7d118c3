//! JSON-RPC client for Ethereum-style chain nodes.
//!
//! Issues the two read-only queries the scanner needs:
//! - `eth_blockNumber` for the current chain height
//! - `eth_getBlockByNumber` (with full transaction objects) for block contents
//!
//! Responses are decoded into typed structs; any shape the node returns that
//! does not match becomes a [`ChainError::Decode`] rather than a panic. The
//! client never retries.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use crate::{
    error::{ChainError, ChainResult},
    provider::{BlockProvider, HeightProvider},
    transaction::{encode_block_number, Address, Transaction},
};

/// Default timeout for RPC requests
pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(30);

/// JSON-RPC 2.0 request
#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: Value,
    id: u64,
}

/// JSON-RPC 2.0 response
#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    error: Option<JsonRpcError>,
}

/// JSON-RPC error object
#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

/// Block object returned by `eth_getBlockByNumber`.
///
/// Only the transaction list is read; other header fields are ignored.
#[derive(Debug, Deserialize)]
struct RpcBlock {
    #[serde(default)]
    transactions: Option<Vec<RpcTransaction>>,
}

/// Full transaction object inside a block.
#[derive(Debug, Deserialize)]
struct RpcTransaction {
    hash: String,
    from: String,
    to: String,
}

/// Client for a single chain node.
#[derive(Debug, Clone)]
pub struct RpcClient {
    client: reqwest::Client,
    endpoint: String,
}

impl RpcClient {
    /// Create a client for `endpoint` with the default request timeout.
    pub fn new(endpoint: &str) -> ChainResult<Self> {
        Self::with_timeout(endpoint, DEFAULT_RPC_TIMEOUT)
    }

    /// Create a client for `endpoint` with a custom request timeout.
    pub fn with_timeout(endpoint: &str, timeout: Duration) -> ChainResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    /// Get the node endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Get the latest block number.
    pub async fn current_height(&self, request_id: u64) -> ChainResult<u64> {
        let body = self.call("eth_blockNumber", json!([]), request_id).await?;
        decode_height(&body)
    }

    /// Get every transaction in block `block_number`.
    pub async fn block_transactions(
        &self,
        block_number: u64,
        request_id: u64,
    ) -> ChainResult<Vec<Transaction>> {
        let body = self
            .call(
                "eth_getBlockByNumber",
                json!([encode_block_number(block_number), true]),
                request_id,
            )
            .await?;
        decode_block_transactions(&body, block_number)
    }

    /// POST one request and return the raw response body.
    async fn call(&self, method: &str, params: Value, request_id: u64) -> ChainResult<Vec<u8>> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id: request_id,
        };

        debug!("RPC {} (id {}) -> {}", method, request_id, self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ChainError::Transport(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl HeightProvider for RpcClient {
    async fn current_height(&self, request_id: u64) -> ChainResult<u64> {
        RpcClient::current_height(self, request_id).await
    }
}

#[async_trait]
impl BlockProvider for RpcClient {
    async fn block_transactions(
        &self,
        block_number: u64,
        request_id: u64,
    ) -> ChainResult<Vec<Transaction>> {
        RpcClient::block_transactions(self, block_number, request_id).await
    }
}

/// Parse a JSON-RPC envelope, surfacing node errors and a missing result.
fn decode_result<T: DeserializeOwned>(body: &[u8], what: &str) -> ChainResult<T> {
    let response: JsonRpcResponse<T> = serde_json::from_slice(body)
        .map_err(|e| ChainError::Decode(format!("invalid {} response: {}", what, e)))?;

    if let Some(error) = response.error {
        return Err(ChainError::Rpc {
            code: error.code,
            message: error.message,
        });
    }

    response
        .result
        .ok_or_else(|| ChainError::Decode(format!("missing result in {} response", what)))
}

/// Decode an `eth_blockNumber` response body.
pub(crate) fn decode_height(body: &[u8]) -> ChainResult<u64> {
    let hex: String = decode_result(body, "block number")?;
    parse_quantity(&hex)
}

/// Decode an `eth_getBlockByNumber` response body.
///
/// Transactions are stamped with `block_number` rather than whatever number
/// the node echoes back.
pub(crate) fn decode_block_transactions(
    body: &[u8],
    block_number: u64,
) -> ChainResult<Vec<Transaction>> {
    let block: RpcBlock = decode_result(body, "block")?;

    let Some(transactions) = block.transactions else {
        debug!("No transactions found for block {}", block_number);
        return Ok(Vec::new());
    };

    let block_number = encode_block_number(block_number);
    Ok(transactions
        .into_iter()
        .map(|tx| Transaction {
            hash: tx.hash,
            from: Address::new(tx.from),
            to: Address::new(tx.to),
            block_number: block_number.clone(),
        })
        .collect())
}

/// Parse a `0x`-prefixed hex quantity.
pub fn parse_quantity(value: &str) -> ChainResult<u64> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .ok_or_else(|| ChainError::Format(format!("missing 0x prefix: {:?}", value)))?;

    u64::from_str_radix(digits, 16)
        .map_err(|e| ChainError::Format(format!("invalid hex quantity {:?}: {}", value, e)))
}
