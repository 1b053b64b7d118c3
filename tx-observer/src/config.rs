//! Configuration for the observer.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Output format for scan reports.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One line per transaction plus a summary
    #[default]
    Text,
    /// One JSON object per report, one per line
    Json,
    /// Pretty-printed JSON
    Pretty,
}

/// Observer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObserverConfig {
    /// JSON-RPC endpoint of the chain node
    #[serde(default = "default_rpc_endpoint")]
    pub rpc_endpoint: String,

    /// Addresses to subscribe at startup
    #[serde(default = "default_addresses")]
    pub addresses: Vec<String>,

    /// Number of trailing blocks to scan
    #[serde(default = "default_block_range")]
    pub block_range: u64,

    /// JSON-RPC request id
    #[serde(default = "default_request_id")]
    pub request_id: u64,

    /// HTTP request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Output format for scan reports
    #[serde(default)]
    pub output_format: OutputFormat,
}

fn default_rpc_endpoint() -> String {
    "https://cloudflare-eth.com".to_string()
}

fn default_addresses() -> Vec<String> {
    vec!["0x0000000000000000000000000000000000000011".to_string()]
}

fn default_block_range() -> u64 {
    1
}

fn default_request_id() -> u64 {
    1
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            rpc_endpoint: default_rpc_endpoint(),
            addresses: default_addresses(),
            block_range: default_block_range(),
            request_id: default_request_id(),
            request_timeout_secs: default_request_timeout(),
            output_format: OutputFormat::default(),
        }
    }
}

impl ObserverConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &std::path::Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ObserverConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> anyhow::Result<()> {
        let url = reqwest::Url::parse(&self.rpc_endpoint)
            .map_err(|e| anyhow::anyhow!("rpc_endpoint is not a valid URL: {}", e))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!(
                "rpc_endpoint must use http or https, got {}",
                url.scheme()
            );
        }

        if self.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than 0");
        }

        if let Some(index) = self.addresses.iter().position(|a| a.is_empty()) {
            anyhow::bail!("addresses[{}] is empty", index);
        }

        // Every block is a sequential round trip
        if self.block_range > 10_000 {
            tracing::warn!(
                "Large block range ({} blocks) will issue one request per block",
                self.block_range
            );
        }

        Ok(())
    }

    /// Get the request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = ObserverConfig::default();
        assert_eq!(config.rpc_endpoint, "https://cloudflare-eth.com");
        assert_eq!(config.block_range, 1);
        assert_eq!(config.request_id, 1);
        assert_eq!(config.output_format, OutputFormat::Text);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
rpc_endpoint = "http://localhost:8545"
addresses = ["0xabc", "0xdef"]
block_range = 25
output_format = "json"
"#
        )
        .unwrap();

        let config = ObserverConfig::from_file(file.path()).unwrap();
        assert_eq!(config.rpc_endpoint, "http://localhost:8545");
        assert_eq!(config.addresses, vec!["0xabc", "0xdef"]);
        assert_eq!(config.block_range, 25);
        assert_eq!(config.request_id, 1);
        assert_eq!(config.output_format, OutputFormat::Json);
    }

    #[test]
    fn test_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ObserverConfig::from_file(&dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn test_validate_bad_endpoint() {
        let config = ObserverConfig {
            rpc_endpoint: "not a url".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ObserverConfig {
            rpc_endpoint: "ftp://node.example".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_timeout() {
        let config = ObserverConfig {
            request_timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_empty_address() {
        let config = ObserverConfig {
            addresses: vec!["0x11".to_string(), String::new()],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
