//! Structural classification of synthesizable types.

use std::fmt;

/// How a type is built when no generator is registered for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Bool,
    Signed,
    Unsigned,
    Float,
    Char,
    String,
    /// Fixed-length homogeneous sequence
    Array,
    /// Variable-length homogeneous sequence
    List,
    Map,
    Optional,
    /// Product of named or positional fields
    Record,
    Function,
    Other,
}

impl Shape {
    /// Function and opaque shapes can never be synthesized.
    pub fn is_supported(self) -> bool {
        !matches!(self, Shape::Function | Shape::Other)
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, Shape::Signed | Shape::Unsigned | Shape::Float)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Shape::Bool => "boolean",
            Shape::Signed => "signed integer",
            Shape::Unsigned => "unsigned integer",
            Shape::Float => "float",
            Shape::Char => "char",
            Shape::String => "string",
            Shape::Array => "array",
            Shape::List => "list",
            Shape::Map => "map",
            Shape::Optional => "optional",
            Shape::Record => "record",
            Shape::Function => "function",
            Shape::Other => "opaque",
        };
        f.write_str(name)
    }
}
