//! ---
//! engage_section: "06-operator-tooling"
//! engage_subsection: "binary"
//! engage_type: "source"
//! engage_scope: "code"
//! engage_description: "Descriptor file validation command."
//! engage_version: "v0.0.0-prealpha"
//! engage_owner: "tbd"
//! ---
use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Args;
use engage_logging::{eg_info, LogContext};
use engage_model::catalog;
use engage_model::codec::{parse_text, to_text};
use engage_model::{FileSource, FsFileSource};

use crate::config::SchemaSettings;

#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Catalogued type the file should decode as, e.g. `EnginePolicy`.
    #[arg(long = "type", value_name = "NAME")]
    type_name: String,
    /// Descriptor file to check.
    #[arg(value_name = "FILE")]
    file: PathBuf,
    /// Leave `@path` secret references unresolved.
    #[arg(long)]
    no_indirection: bool,
    /// Pretty-print the normalised output.
    #[arg(long)]
    pretty: bool,
}

pub fn run(command: CheckCommand, settings: &SchemaSettings) -> Result<()> {
    let entry = catalog::find(&command.type_name).ok_or_else(|| {
        anyhow!(
            "unknown descriptor type {} (see `engagectl schema list`)",
            command.type_name
        )
    })?;
    let text = fs::read_to_string(&command.file)
        .with_context(|| format!("unable to read {}", command.file.display()))?;
    let tree = parse_text(&text)
        .with_context(|| format!("{} is not a JSON document", command.file.display()))?;

    let files = FsFileSource;
    let source: Option<&dyn FileSource> = if command.no_indirection {
        None
    } else {
        Some(&files)
    };
    let normalized = entry.normalize(&tree, source).with_context(|| {
        format!("{} does not decode as {}", command.file.display(), entry.name)
    })?;

    let indent = command.pretty.then_some(settings.indent);
    println!("{}", to_text(&normalized, indent));
    eg_info!(
        context = LogContext::new().with_descriptor(entry.name),
        "{} passed",
        command.file.display()
    );
    Ok(())
}
