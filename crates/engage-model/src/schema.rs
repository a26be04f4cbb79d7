//! ---
//! engage_section: "03-schema-documenter"
//! engage_subsection: "module"
//! engage_type: "source"
//! engage_scope: "code"
//! engage_description: "Emits the encoded default instance of each catalogued type."
//! engage_version: "v0.0.0-prealpha"
//! engage_owner: "tbd"
//! ---
//! The documentation is produced by the same encode path used at runtime, so
//! it cannot drift from actual wire behaviour.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, error};

use crate::catalog::CatalogEntry;
use crate::codec::to_text;

/// Indentation used for documentation output unless configured otherwise.
pub const DEFAULT_INDENT: usize = 3;

const RULE: &str = "------------------------------------------------";

/// Result of documenting one type.
#[derive(Debug)]
pub struct DocumentOutcome {
    pub name: &'static str,
    /// File written for this type, when a directory was supplied and the
    /// write succeeded.
    pub file: Option<PathBuf>,
    /// Target that could not be written.
    pub failed: Option<PathBuf>,
}

impl DocumentOutcome {
    pub fn is_ok(&self) -> bool {
        self.failed.is_none()
    }
}

/// Writes example documents for catalog entries to a console stream and,
/// optionally, to `<directory>/<TypeName>.json`.
pub struct Documenter<'a, W: Write> {
    out: W,
    directory: Option<&'a Path>,
    indent: usize,
}

impl<'a, W: Write> Documenter<'a, W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            directory: None,
            indent: DEFAULT_INDENT,
        }
    }

    pub fn with_directory(mut self, directory: &'a Path) -> Self {
        self.directory = Some(directory);
        self
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Document a single type. A file that cannot be written is reported on
    /// the console stream; only console failures are returned as errors.
    pub fn document(&mut self, entry: &CatalogEntry) -> io::Result<DocumentOutcome> {
        let text = to_text(&entry.example(), Some(self.indent));
        writeln!(self.out, "{RULE}")?;
        writeln!(self.out, "{}", entry.name)?;
        writeln!(self.out, "{text}")?;
        writeln!(self.out, "{RULE}")?;

        let mut outcome = DocumentOutcome {
            name: entry.name,
            file: None,
            failed: None,
        };
        let Some(directory) = self.directory else {
            return Ok(outcome);
        };

        let path = directory.join(format!("{}.json", entry.name));
        match fs::write(&path, text.as_bytes()) {
            Ok(()) => {
                debug!(descriptor = entry.name, path = %path.display(), "documentation written");
                outcome.file = Some(path);
            }
            Err(err) => {
                error!(descriptor = entry.name, path = %path.display(), error = %err, "cannot write documentation");
                writeln!(self.out, "ERROR: Cannot write to {}", path.display())?;
                outcome.failed = Some(path);
            }
        }
        Ok(outcome)
    }

    /// Document every entry in order, continuing past file write failures.
    pub fn document_all(&mut self, entries: &[CatalogEntry]) -> io::Result<Vec<DocumentOutcome>> {
        entries.iter().map(|entry| self.document(entry)).collect()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
