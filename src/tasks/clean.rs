//! Removal of build artifacts: objects, runners, executables and marker
//! files under the configured build path.

use std::fs;

use log::info;

use crate::config::ToolchainConfig;
use crate::utils::ToolResult;

pub struct CleanTask {
    cfg: ToolchainConfig,
}

impl CleanTask {
    pub fn new(cfg: ToolchainConfig) -> Self {
        CleanTask { cfg }
    }

    /// Deletes regular files directly under the build path (and the runner
    /// directory when it is separate). Subdirectories are left alone.
    pub fn execute(&self) -> ToolResult<()> {
        let mut removed = clean_dir(&self.cfg.compiler.build_path)?;
        if self.cfg.runner_source_dir() != self.cfg.compiler.build_path {
            removed += clean_dir(self.cfg.runner_source_dir())?;
        }
        info!("==> Removed {} build artifact(s)", removed);
        Ok(())
    }
}

fn clean_dir(dir: &str) -> ToolResult<usize> {
    let mut removed = 0;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            fs::remove_file(&path)?;
            removed += 1;
        }
    }
    Ok(removed)
}
