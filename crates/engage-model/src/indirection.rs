//! ---
//! engage_section: "02-serialization-codec"
//! engage_subsection: "module"
//! engage_type: "source"
//! engage_scope: "code"
//! engage_description: "Resolution of @path references in secret-bearing fields."
//! engage_version: "v0.0.0-prealpha"
//! engage_owner: "tbd"
//! ---
//! Certificate and key fields may hold `@/path/to/file` instead
//! of the material itself. After decoding, such values are replaced by the
//! full text of the named file. A file that cannot be read leaves the field
//! empty.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// Marker that turns a string field into a file reference.
pub const INDIRECTION_PREFIX: char = '@';

/// Where indirection targets are read from.
pub trait FileSource {
    fn read_text(&self, path: &Path) -> io::Result<String>;
}

/// Reads indirection targets from the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsFileSource;

impl FileSource for FsFileSource {
    fn read_text(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }
}

/// In-memory file table, useful for tests and for callers that stage
/// secret material without touching disk.
#[derive(Debug, Default, Clone)]
pub struct MemoryFileSource {
    files: HashMap<PathBuf, String>,
}

impl MemoryFileSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        self.insert(path, contents);
        self
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        self.files.insert(path.into(), contents.into());
    }
}

impl FileSource for MemoryFileSource {
    fn read_text(&self, path: &Path) -> io::Result<String> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} is not staged", path.display()),
            )
        })
    }
}

/// True when `value` names a file rather than carrying material inline.
pub fn is_indirection(value: &str) -> bool {
    value.starts_with(INDIRECTION_PREFIX)
}

/// Replace an `@path` value with the contents of `path`.
///
/// Values without the prefix are left alone. Missing, unreadable, or empty
/// files clear the value.
pub fn resolve_secret(value: &mut String, files: &dyn FileSource) {
    let Some(path) = value.strip_prefix(INDIRECTION_PREFIX) else {
        return;
    };
    let path = PathBuf::from(path);
    match files.read_text(&path) {
        Ok(contents) if !contents.is_empty() => {
            debug!(path = %path.display(), bytes = contents.len(), "resolved indirection");
            *value = contents;
        }
        Ok(_) => {
            warn!(path = %path.display(), "indirection target is empty; clearing field");
            value.clear();
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "cannot read indirection target; clearing field");
            value.clear();
        }
    }
}
