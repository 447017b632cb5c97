// hde/src/main.rs
//! Entry point of the `hde` binary.

use anyhow::Result;
use clap::Parser;

use hde::cli::{Cli, Commands};
use hde::commands::{analyze, error_msg, inspect};
use hde::logger;
use hde::ui::theme::ThemeStyle;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init_logger(logger::level_from_flags(cli.quiet, cli.debug));
    let theme_map = ThemeStyle::default_theme_map();

    let outcome = match &cli.command {
        Commands::Analyze(cmd) => analyze::run_analyze(cmd, cli.quiet, &theme_map),
        Commands::Inspect(cmd) => inspect::run_inspect(cmd, &theme_map),
    };

    if let Err(e) = outcome {
        error_msg(format!("{:#}", e), &theme_map);
        std::process::exit(1);
    }
    Ok(())
}
