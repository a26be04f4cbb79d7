//! ---
//! engage_section: "06-operator-tooling"
//! engage_subsection: "binary"
//! engage_type: "source"
//! engage_scope: "code"
//! engage_description: "Operator CLI for documenting and validating Engage descriptors."
//! engage_version: "v0.0.0-prealpha"
//! engage_owner: "tbd"
//! ---
use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use engage_logging::{self as logging, ConsoleTarget};

mod check;
mod config;
mod schema;

use config::CtlConfig;

#[derive(Debug, Parser)]
#[command(
    author,
    disable_version_flag = true,
    about = "Engage descriptor operator utility",
    long_about = None
)]
struct Cli {
    #[arg(
        short = 'V',
        long = "version",
        action = ArgAction::SetTrue,
        help = "Print version information and exit"
    )]
    version: bool,
    /// Configuration file (defaults to ENGAGECTL_CONFIG, ./engagectl.toml, /etc/engage/engagectl.toml).
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(subcommand, about = "Descriptor schema documentation")]
    Schema(schema::SchemaCommand),
    #[command(about = "Decode a descriptor file and print its normalised form")]
    Check(check::CheckCommand),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.version {
        println!("engagectl {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let mut config = CtlConfig::load(cli.config.as_deref())?;
    // stdout carries command output.
    config.logging.console = ConsoleTarget::Stderr;
    logging::init_tracing("engagectl", &config.logging)?;

    match command {
        Commands::Schema(cmd) => schema::run(cmd, &config.schema)?,
        Commands::Check(cmd) => check::run(cmd, &config.schema)?,
    }
    Ok(())
}
