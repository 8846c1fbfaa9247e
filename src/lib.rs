/// The dynamic, runtime-tagged value model
pub mod value;

/// Delimiter matching used by the parser
pub mod locate;

/// Convenience functions and utilities
mod utils;


/// JSON text into [Value]
pub mod parser;

/// [Value] into JSON text
pub mod stringify;

/// The deserialization module, for `serde` compatibility (optional feature)
#[cfg(feature = "serde")]
pub mod de;

/// The serialization module, for `serde` compatibility (optional feature)
#[cfg(feature = "serde")]
pub mod ser;

/// The `serde` deserializer
#[cfg(feature = "serde")]
pub use de::{from_str, from_value, ValueDeserializer};

/// the `serde` serializer
#[cfg(feature = "serde")]
pub use ser::{to_string, to_value, SerdeJSONError, ValueSerializer};

/// turn your strings into a dynamic [Value]
pub use parser::from_str as parse;

/// parsing with a non-default nesting limit, or from raw bytes
pub use parser::{from_bytes, from_str_with_config, ParserConfig, ParsingError};

/// turn a [Value] back into JSON text
pub use stringify::stringify;

pub use value::{ElementTag, Map, Tag, TypedArray, Value};

#[doc = include_str!("../README.md")]
#[cfg(doctest)]
pub struct ReadmeDoctests;
