mod cli;
mod commands;

use clap::Parser;
use cli::Cli;

fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    commands::convert::run(
        cli.source,
        cli.config,
        cli.log_file,
        cli.dry_run,
        cli.verbose,
    )
}
