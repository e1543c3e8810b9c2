use std::process::ExitCode;

use clap::Parser;
use kindle_popup::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    kindle_popup::logging::initialize(cli.log_file.as_deref(), cli.verbose);
    kindle_popup::run(cli).await
}
