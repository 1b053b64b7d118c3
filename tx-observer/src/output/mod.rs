//! Output handlers for scan reports.

mod stdout;

pub use stdout::StdoutHandler;

use crate::{config::OutputFormat, scanner::ScanReport};
use async_trait::async_trait;

/// Trait for scan report output handlers.
#[async_trait]
pub trait OutputHandler: Send + Sync {
    /// Handle one scan report.
    async fn handle(&self, report: &ScanReport) -> anyhow::Result<()>;

    /// Handle a batch of reports.
    async fn handle_batch(&self, reports: &[ScanReport]) -> anyhow::Result<()> {
        for report in reports {
            self.handle(report).await?;
        }
        Ok(())
    }
}

/// Create an output handler for the configured format.
pub fn create_handler(format: OutputFormat) -> Box<dyn OutputHandler> {
    Box::new(StdoutHandler::new(format))
}
