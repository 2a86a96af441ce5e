use clap::Parser;
use folio_sdk::{init_logging, LogFormat};

mod cli;
mod commands;
mod render;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let format = match cli.format {
        cli::OutputFormat::Text => LogFormat::Human,
        cli::OutputFormat::Json => LogFormat::Json,
    };
    init_logging(format, cli.log_level());
    commands::run_command(cli)
}
