//! Properties: class attributes and association ends.

use super::{Multiplicity, PrimitiveType, TypeRef};
use serde::{Deserialize, Serialize};

/// A named, typed property.
///
/// Used both for class attributes and for association ends. As an end, `ty`
/// names the class at that end and `multiplicity` constrains, per instance of
/// the opposite end's class, how many instances of this end's class may be
/// linked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    /// Property name (role name for association ends).
    pub name: String,
    /// Property type. A property without a type is rejected during verification.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub ty: Option<TypeRef>,
    /// Multiplicity; attributes default to `1..1` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplicity: Option<Multiplicity>,
}

impl Property {
    /// Create a typed property with no explicit multiplicity.
    pub fn new(name: impl Into<String>, ty: impl Into<TypeRef>) -> Self {
        Self {
            name: name.into(),
            ty: Some(ty.into()),
            multiplicity: None,
        }
    }

    /// Create a property without a type.
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: None,
            multiplicity: None,
        }
    }

    /// Create a primitive-typed attribute.
    pub fn primitive(name: impl Into<String>, primitive: PrimitiveType) -> Self {
        Self::new(name, TypeRef::Primitive(primitive))
    }

    /// Create an enumeration-typed attribute.
    pub fn enumeration(name: impl Into<String>, enumeration: impl Into<String>) -> Self {
        Self::new(name, TypeRef::enumeration(enumeration))
    }

    /// Create an association end bound to a class.
    pub fn end(name: impl Into<String>, class: impl Into<String>, multiplicity: Multiplicity) -> Self {
        Self::new(name, TypeRef::class(class)).with_multiplicity(multiplicity)
    }

    /// Set the multiplicity.
    pub fn with_multiplicity(mut self, multiplicity: Multiplicity) -> Self {
        self.multiplicity = Some(multiplicity);
        self
    }

    /// The declared multiplicity, or `1..1` when none is declared.
    pub fn effective_multiplicity(&self) -> Multiplicity {
        self.multiplicity.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_defaults_to_exactly_one() {
        let prop = Property::primitive("name", PrimitiveType::String);
        assert_eq!(prop.multiplicity, None);
        assert_eq!(prop.effective_multiplicity(), Multiplicity::one());
    }

    #[test]
    fn test_association_end() {
        let end = Property::end("employees", "Employee", Multiplicity::many());
        assert_eq!(end.ty.as_ref().and_then(|t| t.as_class()), Some("Employee"));
        assert!(end.effective_multiplicity().is_many());
    }
}
