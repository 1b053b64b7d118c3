//! Stdout output handler.

use super::OutputHandler;
use crate::{config::OutputFormat, scanner::ScanReport};
use async_trait::async_trait;

/// Handler that prints reports to stdout.
pub struct StdoutHandler {
    format: OutputFormat,
}

impl StdoutHandler {
    /// Create a new stdout handler.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Render a report in this handler's format.
    pub fn render(&self, report: &ScanReport) -> String {
        match self.format {
            OutputFormat::Text => render_text(report),
            OutputFormat::Json => report.to_json(),
            OutputFormat::Pretty => report.to_json_pretty(),
        }
    }
}

impl Default for StdoutHandler {
    fn default() -> Self {
        Self::new(OutputFormat::default())
    }
}

#[async_trait]
impl OutputHandler for StdoutHandler {
    async fn handle(&self, report: &ScanReport) -> anyhow::Result<()> {
        println!("{}", self.render(report));
        Ok(())
    }
}

fn render_text(report: &ScanReport) -> String {
    let mut lines: Vec<String> = report
        .transactions
        .iter()
        .map(|tx| {
            format!(
                "Transaction: Hash={} From={} To={} Block={}",
                tx.hash, tx.from, tx.to, tx.block_number
            )
        })
        .collect();

    if report.transactions.is_empty() {
        lines.push(format!("No transactions found for address {}", report.address));
    }

    for failure in &report.failed_blocks {
        lines.push(format!(
            "Block {} skipped: {}",
            failure.block_number, failure.error
        ));
    }

    if report.all_blocks_failed() {
        lines.push(format!(
            "Warning: all {} block(s) failed, result for {} is unknown",
            report.window.len(),
            report.address
        ));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ChainError, transaction::Transaction, window::BlockWindow};

    fn report() -> ScanReport {
        let mut report = ScanReport::new("0x11".into(), Some(100), BlockWindow::new(100, 2));
        report.blocks_scanned = 1;
        report
            .transactions
            .push(Transaction::new("0xaa", "0x11", "0x22", 100));
        report.failed_blocks.push(crate::scanner::BlockFailure {
            block_number: 99,
            error: ChainError::Transport("HTTP error: 502 Bad Gateway".to_string()),
        });
        report
    }

    #[test]
    fn test_render_text() {
        let text = StdoutHandler::new(OutputFormat::Text).render(&report());
        assert_eq!(
            text,
            "Transaction: Hash=0xaa From=0x11 To=0x22 Block=0x64\n\
             Block 99 skipped: Transport error: HTTP error: 502 Bad Gateway"
        );
    }

    #[test]
    fn test_render_text_all_failed() {
        let mut report = ScanReport::new("0x11".into(), Some(5), BlockWindow::new(5, 1));
        report.failed_blocks.push(crate::scanner::BlockFailure {
            block_number: 5,
            error: ChainError::Decode("missing result in block response".to_string()),
        });

        let text = StdoutHandler::default().render(&report);
        assert!(text.starts_with("No transactions found for address 0x11"));
        assert!(text.ends_with("Warning: all 1 block(s) failed, result for 0x11 is unknown"));
    }

    #[test]
    fn test_render_json() {
        let json = StdoutHandler::new(OutputFormat::Json).render(&report());
        assert!(!json.contains('\n'));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["address"], "0x11");
        assert_eq!(value["transactions"][0]["blockNumber"], "0x64");
        assert_eq!(value["failed_blocks"][0]["block_number"], 99);
    }
}
