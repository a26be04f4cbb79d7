//! ---
//! engage_section: "02-serialization-codec"
//! engage_subsection: "module"
//! engage_type: "source"
//! engage_scope: "code"
//! engage_description: "Declarative field tables driving the descriptor codec."
//! engage_version: "v0.0.0-prealpha"
//! engage_owner: "tbd"
//! ---

/// Declare an enumeration carried on the wire as an integer ordinal.
///
/// The generated type exposes `ordinal()`, `from_ordinal()`, an `ALL` list and
/// a [`WireValue`](crate::codec::WireValue) implementation. Ordinals without a
/// matching variant decode as [`FieldError::UnknownVariant`](crate::codec::FieldError),
/// which the codec turns into the field default.
#[macro_export]
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident default $default:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $ordinal:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every variant in declaration order.
            pub const ALL: &'static [$name] = &[ $( $name::$variant ),+ ];

            /// Integer ordinal carried on the wire.
            #[must_use]
            pub fn ordinal(self) -> i64 {
                match self {
                    $( $name::$variant => $ordinal ),+
                }
            }

            /// Resolve a wire ordinal, returning `None` when no variant matches.
            #[must_use]
            pub fn from_ordinal(ordinal: i64) -> Option<Self> {
                match ordinal {
                    $( $ordinal => Some($name::$variant), )+
                    _ => None,
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl $crate::codec::WireValue for $name {
            fn to_wire(&self) -> $crate::codec::Value {
                $crate::codec::Value::from(self.ordinal())
            }

            fn from_wire(
                value: &$crate::codec::Value,
            ) -> ::std::result::Result<Self, $crate::codec::FieldError> {
                let ordinal = <i64 as $crate::codec::WireValue>::from_wire(value)?;
                Self::from_ordinal(ordinal)
                    .ok_or($crate::codec::FieldError::UnknownVariant { ordinal })
            }
        }
    };
}

/// Bind a descriptor struct to its wire field table.
///
/// Each entry reads `field: "wireKey" [rule, extras...]` where `rule` is one of
///
/// * `required` - absence or mismatch fails the whole descriptor
/// * `optional` - absence or mismatch keeps the reset value
/// * `optional(expr)` - absence or mismatch assigns `expr`
/// * `transient` - runtime only, never read or written
///
/// and the extras are any of `omit_when(expr)` (skip on encode when equal),
/// `secret` (apply `@path` indirection after decode) and `read_as("key")`
/// (decode from a different key than the one emitted).
///
/// An optional `unset_when(closure)` header makes the whole descriptor encode
/// to `null`.
#[macro_export]
macro_rules! wire_descriptor {
    (
        $ty:ident => $name:literal $( unset_when ( $unset:expr ) )? {
            $(
                $field:ident : $key:literal [
                    $rule:ident $( ( $default:expr ) )?
                    $( , $extra:ident $( ( $($earg:tt)* ) )? )*
                ]
            ),* $(,)?
        }
    ) => {
        impl $crate::codec::Descriptor for $ty {
            const NAME: &'static str = $name;

            $(
                fn is_unset(&self) -> bool {
                    ($unset)(self)
                }
            )?

            fn encode_fields(&self, out: &mut $crate::codec::Map<String, $crate::codec::Value>) {
                $(
                    if $crate::wire_descriptor!(@emit_rule $rule) $( && $crate::wire_descriptor!(
                        @emit self.$field, $extra ( $( $($earg)* )? )
                    ) )* {
                        out.insert(
                            $key.to_owned(),
                            $crate::codec::WireValue::to_wire(&self.$field),
                        );
                    }
                )*
            }

            fn decode_fields(
                tree: &$crate::codec::Map<String, $crate::codec::Value>,
            ) -> $crate::codec::Result<Self> {
                #[allow(unused_mut)]
                let mut decoded = <$ty as ::std::default::Default>::default();
                $(
                    $crate::wire_descriptor!(
                        @decode tree, decoded, $field,
                        $crate::wire_descriptor!(@read_key $key ; $( $extra ( $( $($earg)* )? ) ),* ),
                        $rule ( $($default)? )
                    );
                )*
                Ok(decoded)
            }

            #[allow(unused_variables)]
            fn resolve_secrets(&mut self, files: &dyn $crate::indirection::FileSource) {
                $(
                    $crate::codec::WireValue::resolve_indirections(&mut self.$field, files);
                    $( $crate::wire_descriptor!(@secret self.$field, files, $extra ( $( $($earg)* )? )); )*
                )*
            }
        }

        impl $crate::codec::WireValue for $ty {
            fn to_wire(&self) -> $crate::codec::Value {
                $crate::codec::Descriptor::encode(self)
            }

            fn from_wire(
                value: &$crate::codec::Value,
            ) -> ::std::result::Result<Self, $crate::codec::FieldError> {
                match value {
                    $crate::codec::Value::Object(map) => {
                        <$ty as $crate::codec::Descriptor>::decode_fields(map)
                            .map_err(|err| $crate::codec::FieldError::Nested(Box::new(err)))
                    }
                    _ => Err($crate::codec::FieldError::TypeMismatch { expected: "object" }),
                }
            }

            fn resolve_indirections(&mut self, files: &dyn $crate::indirection::FileSource) {
                $crate::codec::Descriptor::resolve_secrets(self, files);
            }
        }
    };

    (@emit_rule transient) => {
        false
    };
    (@emit_rule $other:ident) => {
        true
    };

    (@emit $value:expr, omit_when ( $sentinel:expr )) => {
        ($value != $sentinel)
    };
    (@emit $value:expr, $other:ident ( $($arg:tt)* )) => {
        true
    };

    (@read_key $key:literal ; ) => {
        $key
    };
    (@read_key $key:literal ; read_as ( $alt:literal ) $( , $($rest:tt)* )? ) => {
        $alt
    };
    (@read_key $key:literal ; $other:ident ( $($arg:tt)* ) $( , $($rest:tt)* )? ) => {
        $crate::wire_descriptor!(@read_key $key ; $( $($rest)* )?)
    };

    (@decode $tree:ident, $out:ident, $field:ident, $key:expr, required ()) => {
        $out.$field = $crate::codec::read_required(
            $tree,
            $key,
            <Self as $crate::codec::Descriptor>::NAME,
        )?;
    };
    (@decode $tree:ident, $out:ident, $field:ident, $key:expr, optional ()) => {
        if let Some(value) = $crate::codec::read_optional($tree, $key) {
            $out.$field = value;
        }
    };
    (@decode $tree:ident, $out:ident, $field:ident, $key:expr, optional ( $default:expr )) => {
        $out.$field = $crate::codec::read_optional($tree, $key).unwrap_or($default);
    };
    (@decode $tree:ident, $out:ident, $field:ident, $key:expr, transient ()) => {};

    (@secret $value:expr, $files:ident, secret ()) => {
        $crate::indirection::resolve_secret(&mut $value, $files)
    };
    (@secret $value:expr, $files:ident, $other:ident ( $($arg:tt)* )) => {};
}
