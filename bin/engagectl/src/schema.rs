//! ---
//! engage_section: "06-operator-tooling"
//! engage_subsection: "binary"
//! engage_type: "source"
//! engage_scope: "code"
//! engage_description: "Schema documentation commands."
//! engage_version: "v0.0.0-prealpha"
//! engage_owner: "tbd"
//! ---
use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use engage_logging::{eg_warn, LogContext};
use engage_model::catalog::{self, CatalogEntry};
use engage_model::Documenter;
use tracing::info;

use crate::config::SchemaSettings;

#[derive(Debug, Subcommand)]
pub enum SchemaCommand {
    /// Print an example document for catalogued types, optionally writing one file per type.
    Dump(DumpArgs),
    /// List catalogued type names in documentation order.
    List,
}

#[derive(Debug, Args)]
pub struct DumpArgs {
    /// Directory receiving `<Type>.json` files.
    #[arg(long, value_name = "DIR")]
    out: Option<PathBuf>,
    /// Document only the named type; repeatable.
    #[arg(long = "only", value_name = "NAME")]
    only: Vec<String>,
    /// Indentation width of the JSON output.
    #[arg(long, value_name = "N")]
    indent: Option<usize>,
}

pub fn run(command: SchemaCommand, settings: &SchemaSettings) -> Result<()> {
    match command {
        SchemaCommand::Dump(args) => dump(args, settings),
        SchemaCommand::List => {
            for entry in catalog::entries() {
                println!("{}", entry.name);
            }
            Ok(())
        }
    }
}

fn select(only: &[String]) -> Result<Vec<CatalogEntry>> {
    if only.is_empty() {
        return Ok(catalog::entries());
    }
    let unknown: Vec<&str> = only
        .iter()
        .map(String::as_str)
        .filter(|name| catalog::find(name).is_none())
        .collect();
    if !unknown.is_empty() {
        bail!("unknown descriptor type(s): {}", unknown.join(", "));
    }
    // Keep documentation order regardless of flag order.
    Ok(catalog::entries()
        .into_iter()
        .filter(|entry| only.iter().any(|name| name == entry.name))
        .collect())
}

fn dump(args: DumpArgs, settings: &SchemaSettings) -> Result<()> {
    let entries = select(&args.only)?;
    let indent = args.indent.unwrap_or(settings.indent);
    let directory = args.out.or_else(|| settings.output_dir.clone());
    if let Some(directory) = &directory {
        fs::create_dir_all(directory)
            .with_context(|| format!("unable to create {}", directory.display()))?;
    }

    let stdout = io::stdout();
    let mut documenter = Documenter::new(stdout.lock()).with_indent(indent);
    if let Some(directory) = &directory {
        documenter = documenter.with_directory(directory);
    }
    let outcomes = documenter
        .document_all(&entries)
        .context("unable to write documentation to stdout")?;

    let mut failed = 0;
    for outcome in outcomes.iter().filter(|outcome| !outcome.is_ok()) {
        failed += 1;
        eg_warn!(
            context = LogContext::new().with_descriptor(outcome.name),
            "documentation file not written"
        );
    }
    info!(documented = outcomes.len(), failed, "schema dump complete");
    if failed > 0 {
        bail!("{failed} documentation file(s) could not be written");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_keeps_catalog_order() {
        let picked = select(&["Group".to_string(), "RtpHeader".to_string()]).unwrap();
        let names: Vec<_> = picked.iter().map(|entry| entry.name).collect();
        assert_eq!(names, vec!["RtpHeader", "Group"]);
    }

    #[test]
    fn unknown_names_are_reported_together() {
        let err = select(&["Nope".to_string(), "Group".to_string(), "Nada".to_string()])
            .unwrap_err();
        assert_eq!(err.to_string(), "unknown descriptor type(s): Nope, Nada");
    }

    #[test]
    fn empty_selection_means_everything() {
        assert_eq!(select(&[]).unwrap().len(), catalog::entries().len());
    }
}
