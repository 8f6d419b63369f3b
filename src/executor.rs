//! Running a linked test executable, optionally under a simulator.

use std::path::Path;

use crate::command::{CommandExecutor, CommandLine};
use crate::config::ToolchainConfig;
use crate::utils::{ToolError, ToolResult};

/// Command to run one test executable. With no simulator the executable runs
/// directly; otherwise it is wrapped as
/// `<simulator> <pre_support..> <executable> <post_support..>`. A simulator
/// section without a `path` promotes its first support argument to the
/// program.
pub fn execution_command(cfg: &ToolchainConfig, exe_path: &Path) -> CommandLine {
    let exe = exe_path.display().to_string();

    let Some(sim) = &cfg.simulator else {
        return CommandLine::new(&exe);
    };

    let mut tokens: Vec<String> = Vec::new();
    if let Some(path) = &sim.path {
        tokens.push(path.clone());
    }
    tokens.extend(sim.pre_support.iter().cloned());
    tokens.push(exe.clone());
    tokens.extend(sim.post_support.iter().cloned());

    let mut tokens = tokens.into_iter();
    let program = tokens.next().unwrap_or(exe);
    CommandLine::new(program).args(tokens)
}

/// Runs the executable and returns its merged output.
///
/// A nonzero process exit means the run itself failed (missing simulator,
/// crash, bad binary) and is fatal. A test whose assertions fail still exits
/// cleanly; that verdict is read from the output by the classifier, not here.
pub fn run_test(
    cfg: &ToolchainConfig,
    exec: &dyn CommandExecutor,
    exe_path: &Path,
) -> ToolResult<String> {
    let cmd = execution_command(cfg, exe_path);
    let out = exec.execute(&cmd)?;
    if out.code != 0 {
        return Err(ToolError::ExecutionFailed {
            command: cmd.to_string(),
            code: out.code,
        });
    }
    Ok(out.output)
}
