//! docroute - redirect tracing and link validation for documentation sites.

mod cli;
mod config;
mod core;
mod links;
mod logger;
mod mdast;
mod redirect;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = Config::load(&cli)?;

    match &cli.command {
        Commands::Trace { args } => cli::trace::run_trace(args, &config),
        Commands::Links { args } => cli::links::run_links(args, &config),
    }
}
