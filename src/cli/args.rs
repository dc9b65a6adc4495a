//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Redirect tracing and link validation for documentation sites
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: docroute.toml, searched upward from cwd)
    #[arg(short = 'C', long, global = true, default_value = "docroute.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// URL prefix of the documentation pages (overrides `site.base_path`)
    #[arg(long, global = true)]
    pub base_path: Option<String>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Follow a URL through the redirect rules
    #[command(visible_alias = "t")]
    Trace {
        #[command(flatten)]
        args: TraceArgs,
    },

    /// Check and rewrite links in documentation pages
    #[command(visible_alias = "l")]
    Links {
        #[command(flatten)]
        args: LinksArgs,
    },
}

/// Trace command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct TraceArgs {
    /// URL to trace; the base path is added when missing
    #[arg(required_unless_present = "all")]
    pub url: Option<String>,

    /// Trace the source of every static rule
    #[arg(short, long, conflicts_with = "url")]
    pub all: bool,

    /// Print results as JSON
    #[arg(short, long)]
    pub json: bool,

    /// Static rule table (JSON object)
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub static_rules: Option<PathBuf>,

    /// Dynamic rule list (JSON with comments)
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub dynamic_rules: Option<PathBuf>,

    /// Site directory of published URLs
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub directory: Option<PathBuf>,
}

/// Links command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct LinksArgs {
    /// Files or directories to check. If omitted, checks `links.content`.
    /// Use `-` to read paths from stdin.
    #[arg(value_name = "PATH", value_hint = clap::ValueHint::AnyPath)]
    pub paths: Vec<PathBuf>,

    /// Documentation manifest (JSON array of pages)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub manifest: Option<PathBuf>,

    /// Report unknown anchors
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub fragments: Option<bool>,

    /// Treat broken links as warnings instead of errors
    #[arg(long, short = 'w')]
    pub warn_only: bool,

    /// Write each rewritten tree as JSON into this directory
    #[arg(long, value_name = "DIR", value_hint = clap::ValueHint::DirPath)]
    pub emit_ast: Option<PathBuf>,
}
