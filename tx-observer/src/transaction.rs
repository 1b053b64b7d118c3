//! Transaction and address types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An account address as reported by the node.
///
/// Addresses are opaque and compared byte for byte: `0xAbC` and `0xabc` are
/// different addresses.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Create an address from its string form.
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Get the address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check whether the address is the empty string.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(address: &str) -> Self {
        Self::new(address)
    }
}

impl From<String> for Address {
    fn from(address: String) -> Self {
        Self(address)
    }
}

/// A transaction found in a scanned block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction hash (hex)
    pub hash: String,

    /// Sending address
    pub from: Address,

    /// Receiving address
    pub to: Address,

    /// Number of the containing block, `0x`-prefixed hex
    #[serde(rename = "blockNumber")]
    pub block_number: String,
}

impl Transaction {
    /// Create a transaction stamped with the given block number.
    pub fn new(
        hash: impl Into<String>,
        from: impl Into<Address>,
        to: impl Into<Address>,
        block_number: u64,
    ) -> Self {
        Self {
            hash: hash.into(),
            from: from.into(),
            to: to.into(),
            block_number: encode_block_number(block_number),
        }
    }

    /// Check whether the transaction was sent from or to `address`.
    pub fn touches(&self, address: &Address) -> bool {
        self.from == *address || self.to == *address
    }

    /// Convert to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Encode a block number the way JSON-RPC quantities are written.
pub fn encode_block_number(number: u64) -> String {
    format!("{:#x}", number)
}
