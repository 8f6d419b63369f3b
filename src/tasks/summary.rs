//! Standalone summary over marker files from an earlier run.

use crate::config::ToolchainConfig;
use crate::utils::ToolResult;

pub struct SummaryTask {
    cfg: ToolchainConfig,
}

impl SummaryTask {
    pub fn new(cfg: ToolchainConfig) -> Self {
        SummaryTask { cfg }
    }

    pub fn execute(&self) -> ToolResult<()> {
        super::test::report_summary(&self.cfg)
    }
}
