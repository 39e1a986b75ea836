//! Class and enumeration definitions.

use super::Property;
use serde::{Deserialize, Serialize};

/// A class with its directly declared attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Class {
    /// Class name (unique within the model).
    pub name: String,
    /// Attributes declared directly on this class, in declaration order.
    #[serde(default)]
    pub attributes: Vec<Property>,
    /// Abstract classes are never constructed directly.
    #[serde(default)]
    pub is_abstract: bool,
}

impl Class {
    /// Create a class without attributes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            is_abstract: false,
        }
    }

    /// Add an attribute.
    pub fn with_attribute(mut self, attribute: Property) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Add multiple attributes.
    pub fn with_attributes(mut self, attributes: impl IntoIterator<Item = Property>) -> Self {
        self.attributes.extend(attributes);
        self
    }

    /// Mark the class abstract.
    pub fn with_abstract(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Get an attribute by name.
    pub fn get_attribute(&self, name: &str) -> Option<&Property> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

/// A closed set of named literals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enumeration {
    /// Enumeration name (unique within the model).
    pub name: String,
    /// Literal names, in declaration order.
    #[serde(default)]
    pub literals: Vec<String>,
}

impl Enumeration {
    /// Create an enumeration without literals.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            literals: Vec::new(),
        }
    }

    /// Add a literal.
    pub fn with_literal(mut self, literal: impl Into<String>) -> Self {
        self.literals.push(literal.into());
        self
    }

    /// Add multiple literals.
    pub fn with_literals(mut self, literals: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.literals.extend(literals.into_iter().map(Into::into));
        self
    }

    /// Check if a literal is declared.
    pub fn has_literal(&self, literal: &str) -> bool {
        self.literals.iter().any(|l| l == literal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PrimitiveType;

    #[test]
    fn test_class_builder() {
        let person = Class::new("Person")
            .with_attribute(Property::primitive("name", PrimitiveType::String))
            .with_attribute(Property::primitive("email", PrimitiveType::String))
            .with_abstract();

        assert_eq!(person.attributes.len(), 2);
        assert!(person.is_abstract);
        assert!(person.get_attribute("email").is_some());
        assert!(person.get_attribute("age").is_none());
    }

    #[test]
    fn test_enumeration_builder() {
        let role = Enumeration::new("Role").with_literals(["STAFF", "LEAD"]);

        assert!(role.has_literal("LEAD"));
        assert!(!role.has_literal("OWNER"));
    }
}
