//! CLI entry point for the tile map solver

use clap::Parser;
use std::process::ExitCode;
use tilewave::io::cli::{Cli, MapProcessor};

fn main() -> tilewave::Result<ExitCode> {
    let cli = Cli::parse();
    tilewave::io::logging::init(cli.verbose);
    MapProcessor::new(cli).process()
}
