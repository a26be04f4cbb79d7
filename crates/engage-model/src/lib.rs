//! ---
//! engage_section: "01-descriptor-model"
//! engage_subsection: "module"
//! engage_type: "source"
//! engage_scope: "code"
//! engage_description: "Descriptor catalog, codec, and documentation for the engine boundary."
//! engage_version: "v0.0.0-prealpha"
//! engage_owner: "tbd"
//! ---
//! Structured descriptors exchanged between a host application and the
//! Engage group communications engine. This crate exposes the descriptor
//! catalog, the lenient JSON codec, `@path` secret indirection, the schema
//! documenter, and the binary data series found in biometrics blobs.

mod macros;

pub mod catalog;
pub mod codec;
pub mod enums;
pub mod indirection;
pub mod schema;
pub mod series;

pub use catalog::*;
pub use codec::{DecodeError, Descriptor, FieldError, WireValue};
pub use enums::*;
pub use indirection::{FileSource, FsFileSource, MemoryFileSource};
pub use schema::{DocumentOutcome, Documenter};
pub use series::{DataElement, DataSeries, SeriesError};
