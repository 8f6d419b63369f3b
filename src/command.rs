//! Structured command lines and the subprocess executor.
//!
//! Toolchain invocations are built as ordered argument tokens rather than one
//! concatenated shell string, so option-category prefixes (`-D`, `-I`, `-o`)
//! are glued onto their items at construction time and no later quoting or
//! backslash fixups are needed.

use std::fmt;

use log::info;

use crate::utils::ToolResult;

/// One subprocess invocation: a program and its argument tokens.
#[derive(Debug, Clone)]
pub struct CommandLine {
    program: String,
    args: Vec<String>,
}

impl CommandLine {
    pub fn new(program: impl AsRef<str>) -> Self {
        CommandLine {
            program: program.as_ref().to_string(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<str>) -> Self {
        self.args.push(arg.as_ref().to_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_string()));
        self
    }

    /// One token per item, with the category prefix glued on (`-DTEST`,
    /// `-Isrc/`). An empty prefix yields the bare items.
    pub fn prefixed<I, S>(mut self, prefix: &str, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.args
            .extend(items.into_iter().map(|i| format!("{}{}", prefix, i.as_ref())));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arg_tokens(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Captured result of one subprocess run. Stdout and stderr are merged in the
/// order the process produced them; a single trailing newline is chomped.
#[derive(Debug, Clone)]
pub struct ExecOutput {
    pub output: String,
    pub code: i32,
}

/// Runs a command and captures its merged output.
///
/// A nonzero exit is reported through `ExecOutput::code`, never as an `Err`;
/// whether it is fatal is the caller's call (compile and link treat it as a
/// build failure, the test-run step as an execution failure). Only failing to
/// spawn the process at all is an error here.
pub trait CommandExecutor {
    fn execute(&self, cmd: &CommandLine) -> ToolResult<ExecOutput>;
}

/// Real executor backed by `duct`.
pub struct ShellExecutor {
    pub verbose: bool,
}

impl CommandExecutor for ShellExecutor {
    fn execute(&self, cmd: &CommandLine) -> ToolResult<ExecOutput> {
        if self.verbose {
            info!("{}", cmd);
        }

        let result = duct::cmd(cmd.program(), cmd.arg_tokens().iter().cloned())
            .stderr_to_stdout()
            .stdout_capture()
            .unchecked()
            .run()?;

        let output = chomp(String::from_utf8_lossy(&result.stdout).into_owned());
        if self.verbose && !output.is_empty() {
            info!("{}", output);
        }

        Ok(ExecOutput {
            output,
            code: result.status.code().unwrap_or(-1),
        })
    }
}

fn chomp(mut s: String) -> String {
    if s.ends_with('\n') {
        s.pop();
        if s.ends_with('\r') {
            s.pop();
        }
    }
    s
}
