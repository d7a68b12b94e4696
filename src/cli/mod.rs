//! CLI module
//!
//! Command-line front end for the fetcher: one URI in, JSON out.

mod commands;
mod runner;

pub use commands::{parse_header, Cli};
pub use runner::Runner;
