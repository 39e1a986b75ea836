//! Type references used by properties.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Primitive data types a structural model can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveType {
    /// UTF-8 string.
    String,
    /// Integer number.
    Integer,
    /// Floating point number.
    Float,
    /// Boolean value.
    Boolean,
    /// Time of day.
    Time,
    /// Calendar date.
    Date,
    /// Date and time.
    DateTime,
    /// Duration.
    TimeDelta,
    /// Untyped value.
    Any,
}

impl PrimitiveType {
    /// Name of the type as it appears in a model.
    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveType::String => "str",
            PrimitiveType::Integer => "int",
            PrimitiveType::Float => "float",
            PrimitiveType::Boolean => "bool",
            PrimitiveType::Time => "time",
            PrimitiveType::Date => "date",
            PrimitiveType::DateTime => "datetime",
            PrimitiveType::TimeDelta => "timedelta",
            PrimitiveType::Any => "any",
        }
    }

    /// Check if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, PrimitiveType::Integer | PrimitiveType::Float)
    }

    /// Check if this type is a temporal type.
    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            PrimitiveType::Time
                | PrimitiveType::Date
                | PrimitiveType::DateTime
                | PrimitiveType::TimeDelta
        )
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The type of a property: a primitive, a class, or an enumeration.
///
/// Classes and enumerations are referenced by name and resolved when the
/// model is indexed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "name")]
pub enum TypeRef {
    /// A primitive data type.
    Primitive(PrimitiveType),
    /// A class declared in the model.
    Class(String),
    /// An enumeration declared in the model.
    Enumeration(String),
}

impl TypeRef {
    /// Create a class type reference.
    pub fn class(name: impl Into<String>) -> Self {
        TypeRef::Class(name.into())
    }

    /// Create an enumeration type reference.
    pub fn enumeration(name: impl Into<String>) -> Self {
        TypeRef::Enumeration(name.into())
    }

    /// Name of the referenced class, if this is a class reference.
    pub fn as_class(&self) -> Option<&str> {
        match self {
            TypeRef::Class(name) => Some(name),
            _ => None,
        }
    }
}

impl From<PrimitiveType> for TypeRef {
    fn from(primitive: PrimitiveType) -> Self {
        TypeRef::Primitive(primitive)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Primitive(p) => write!(f, "{}", p),
            TypeRef::Class(name) | TypeRef::Enumeration(name) => f.write_str(name),
        }
    }
}
