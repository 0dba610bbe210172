//! # ISI Create CLI
//!
//! Binary entry point for the `isi-create` command-line tool.
//!
//! The binary parses arguments with `clap`, dispatches to the matching
//! command and lets `anyhow` report any fatal error with a non-zero exit
//! code. All scaffolding logic lives in the `isi_create` library crate.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    cli::Cli::parse().execute()
}
