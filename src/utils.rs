#[derive(thiserror::Error, Debug)]
pub enum ToolError {
    #[error("Build step failed: `{command}` (exit code {code})")]
    BuildFailed { command: String, code: i32 },
    #[error("Test executable failed to run: `{command}` (exit code {code})")]
    ExecutionFailed { command: String, code: i32 },
    #[error("Config not found: {0}")]
    ConfigNotFound(String),
    #[error("No test files found in {0}")]
    NoTests(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("config: {0}")]
    Config(#[from] figment::Error),
}

pub type ToolResult<T> = Result<T, ToolError>;
