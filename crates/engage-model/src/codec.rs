//! ---
//! engage_section: "02-serialization-codec"
//! engage_subsection: "module"
//! engage_type: "source"
//! engage_scope: "code"
//! engage_description: "Lenient JSON codec shared by every descriptor."
//! engage_version: "v0.0.0-prealpha"
//! engage_owner: "tbd"
//! ---
//! Descriptors travel as JSON objects whose keys match the field tables
//! declared with [`wire_descriptor!`](crate::wire_descriptor). Decoding is
//! tolerant: optional fields that are missing or carry the wrong JSON type
//! silently keep their default, while a missing or malformed required field
//! rejects the whole descriptor.

use std::fmt;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Serializer;
use thiserror::Error;
use tracing::trace;

use crate::indirection::{FileSource, FsFileSource};

pub use serde_json::{Map, Value};

/// Result alias for descriptor decoding.
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Reasons a descriptor could not be produced from JSON.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("empty input")]
    EmptyInput,

    #[error("malformed JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{descriptor} must be a JSON object")]
    NotAnObject { descriptor: &'static str },

    #[error("{descriptor}.{field} is required")]
    MissingField {
        descriptor: &'static str,
        field: &'static str,
    },

    #[error("{descriptor}.{field} is invalid: {source}")]
    InvalidField {
        descriptor: &'static str,
        field: &'static str,
        #[source]
        source: FieldError,
    },
}

/// Failure to convert a single JSON value into a field.
#[derive(Debug, Error)]
pub enum FieldError {
    #[error("expected {expected}")]
    TypeMismatch { expected: &'static str },

    #[error("value {value} out of range")]
    OutOfRange { value: String },

    #[error("no variant for ordinal {ordinal}")]
    UnknownVariant { ordinal: i64 },

    #[error(transparent)]
    Nested(Box<DecodeError>),

    #[error("element {index}: {source}")]
    Element {
        index: usize,
        #[source]
        source: Box<FieldError>,
    },
}

/// A value that can be stored in a descriptor field.
pub trait WireValue: Sized {
    fn to_wire(&self) -> Value;

    fn from_wire(value: &Value) -> std::result::Result<Self, FieldError>;

    /// Replace `@path` secrets held anywhere inside this value.
    fn resolve_indirections(&mut self, _files: &dyn FileSource) {}
}

/// Common operations of every catalog type.
///
/// Implementations are generated by [`wire_descriptor!`](crate::wire_descriptor);
/// only the provided methods are meant to be called directly.
pub trait Descriptor: Default + Clone + PartialEq + fmt::Debug {
    /// Type name used by the schema documenter and in error messages.
    const NAME: &'static str;

    fn encode_fields(&self, out: &mut Map<String, Value>);

    fn decode_fields(tree: &Map<String, Value>) -> Result<Self>;

    fn resolve_secrets(&mut self, files: &dyn FileSource);

    /// Whether the descriptor as a whole is considered absent on the wire.
    fn is_unset(&self) -> bool {
        false
    }

    /// Return every field to its reset value.
    fn reset(&mut self) {
        *self = Self::default();
    }

    /// Produce the JSON form, `null` when [`Descriptor::is_unset`] holds.
    fn encode(&self) -> Value {
        if self.is_unset() {
            return Value::Null;
        }
        let mut out = Map::new();
        self.encode_fields(&mut out);
        Value::Object(out)
    }

    /// Decode and resolve `@path` secrets against the local filesystem.
    fn decode(tree: &Value) -> Result<Self> {
        Self::decode_with(tree, &FsFileSource)
    }

    fn decode_with(tree: &Value, files: &dyn FileSource) -> Result<Self> {
        let mut decoded = Self::decode_raw(tree)?;
        decoded.resolve_secrets(files);
        Ok(decoded)
    }

    /// Decode without touching `@path` secrets.
    fn decode_raw(tree: &Value) -> Result<Self> {
        match tree {
            Value::Object(map) => Self::decode_fields(map),
            Value::Null => Self::decode_fields(&Map::new()),
            _ => Err(DecodeError::NotAnObject {
                descriptor: Self::NAME,
            }),
        }
    }

    /// Reset, then decode into `self`. On failure `self` stays at its reset value.
    fn decode_in_place(&mut self, tree: &Value) -> Result<()> {
        self.reset();
        *self = Self::decode(tree)?;
        Ok(())
    }

    fn decode_str(text: &str) -> Result<Self> {
        Self::decode_str_with(text, &FsFileSource)
    }

    fn decode_str_with(text: &str, files: &dyn FileSource) -> Result<Self> {
        Self::decode_with(&parse_text(text)?, files)
    }

    /// Compact text when `indent` is `None`, pretty-printed otherwise.
    fn encode_to_string(&self, indent: Option<usize>) -> String {
        to_text(&self.encode(), indent)
    }
}

/// Parse JSON text, rejecting empty or whitespace-only input up front.
pub fn parse_text(text: &str) -> Result<Value> {
    if text.trim().is_empty() {
        return Err(DecodeError::EmptyInput);
    }
    Ok(serde_json::from_str(text)?)
}

/// Render a JSON tree, compact or with `indent` spaces per level.
pub fn to_text(value: &Value, indent: Option<usize>) -> String {
    let Some(width) = indent else {
        return value.to_string();
    };
    let pad = vec![b' '; width];
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(&pad));
    if value.serialize(&mut ser).is_err() {
        return value.to_string();
    }
    String::from_utf8(buf).unwrap_or_else(|_| value.to_string())
}

/// Read a field that must be present and well-typed.
///
/// An enum ordinal with no matching variant is not a failure; it yields the
/// type default.
pub fn read_required<T: WireValue + Default>(
    tree: &Map<String, Value>,
    key: &'static str,
    descriptor: &'static str,
) -> Result<T> {
    let value = tree
        .get(key)
        .ok_or(DecodeError::MissingField { descriptor, field: key })?;
    match T::from_wire(value) {
        Ok(decoded) => Ok(decoded),
        Err(FieldError::UnknownVariant { .. }) => Ok(T::default()),
        Err(source) => Err(DecodeError::InvalidField {
            descriptor,
            field: key,
            source,
        }),
    }
}

/// Read a field whose absence or mismatch falls back to a default.
pub fn read_optional<T: WireValue>(tree: &Map<String, Value>, key: &str) -> Option<T> {
    let value = tree.get(key)?;
    match T::from_wire(value) {
        Ok(decoded) => Some(decoded),
        Err(err) => {
            trace!(field = key, error = %err, "ignoring undecodable optional field");
            None
        }
    }
}

impl WireValue for bool {
    fn to_wire(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_wire(value: &Value) -> std::result::Result<Self, FieldError> {
        value
            .as_bool()
            .ok_or(FieldError::TypeMismatch { expected: "boolean" })
    }
}

impl WireValue for String {
    fn to_wire(&self) -> Value {
        Value::String(self.clone())
    }

    fn from_wire(value: &Value) -> std::result::Result<Self, FieldError> {
        value
            .as_str()
            .map(str::to_owned)
            .ok_or(FieldError::TypeMismatch { expected: "string" })
    }
}

impl WireValue for f64 {
    fn to_wire(&self) -> Value {
        Value::from(*self)
    }

    fn from_wire(value: &Value) -> std::result::Result<Self, FieldError> {
        value
            .as_f64()
            .ok_or(FieldError::TypeMismatch { expected: "number" })
    }
}

macro_rules! wire_integer {
    ($($ty:ty),* $(,)?) => {$(
        impl WireValue for $ty {
            fn to_wire(&self) -> Value {
                Value::from(*self)
            }

            fn from_wire(value: &Value) -> std::result::Result<Self, FieldError> {
                if let Some(signed) = value.as_i64() {
                    return <$ty>::try_from(signed).map_err(|_| FieldError::OutOfRange {
                        value: signed.to_string(),
                    });
                }
                if let Some(unsigned) = value.as_u64() {
                    return <$ty>::try_from(unsigned).map_err(|_| FieldError::OutOfRange {
                        value: unsigned.to_string(),
                    });
                }
                let whole = value
                    .as_f64()
                    .filter(|float| float.fract() == 0.0)
                    .ok_or(FieldError::TypeMismatch { expected: "integer" })?;
                let out_of_range = || FieldError::OutOfRange {
                    value: whole.to_string(),
                };
                // Whole-valued floats such as `5000.0` read as integers.
                if whole < 0.0 {
                    if whole < i64::MIN as f64 {
                        return Err(out_of_range());
                    }
                    <$ty>::try_from(whole as i64).map_err(|_| out_of_range())
                } else {
                    if whole >= u64::MAX as f64 {
                        return Err(out_of_range());
                    }
                    <$ty>::try_from(whole as u64).map_err(|_| out_of_range())
                }
            }
        }
    )*};
}

wire_integer!(u8, u16, u32, u64, i32, i64, usize);

/// Lists decode strictly: one bad element rejects the whole list.
impl<T: WireValue> WireValue for Vec<T> {
    fn to_wire(&self) -> Value {
        Value::Array(self.iter().map(WireValue::to_wire).collect())
    }

    fn from_wire(value: &Value) -> std::result::Result<Self, FieldError> {
        let items = value
            .as_array()
            .ok_or(FieldError::TypeMismatch { expected: "array" })?;
        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                T::from_wire(item).map_err(|source| FieldError::Element {
                    index,
                    source: Box::new(source),
                })
            })
            .collect()
    }

    fn resolve_indirections(&mut self, files: &dyn FileSource) {
        for item in self.iter_mut() {
            item.resolve_indirections(files);
        }
    }
}
