use std::process::exit;

use clap::{Parser, Subcommand};

use ctask::config::ToolchainConfig;
use ctask::tasks;
use ctask::utils::ToolResult;

#[derive(Parser)]
#[command(name = "ctask", version, about = "Build-and-test task runner for C unit test suites")]
struct Cli {
    /// Toolchain profile: a name under targets/, or a path to a profile file
    #[arg(long, global = true, default_value = "gcc")]
    target: String,

    /// Echo executed command lines and their captured output
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build, link and run every unit test, then print the summary
    Test,
    /// Re-print the aggregate summary from existing result files
    Summary,
    /// Remove build artifacts from the configured build path
    Clean,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    if let Err(e) = try_main() {
        log::error!("{}", e);
        exit(1);
    }
}

fn try_main() -> ToolResult<()> {
    let cli = Cli::parse();
    let cfg = ToolchainConfig::load(&cli.target)?;

    match cli.command {
        Command::Test => tasks::test::TestTask::new(cfg, cli.verbose).execute(),
        Command::Summary => tasks::summary::SummaryTask::new(cfg).execute(),
        Command::Clean => tasks::clean::CleanTask::new(cfg).execute(),
    }
}
