//! Command-line interface module.

mod args;
pub mod common;
pub mod links;
pub mod trace;

pub use args::{Cli, Commands, LinksArgs, TraceArgs};
