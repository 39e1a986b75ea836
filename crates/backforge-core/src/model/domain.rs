//! The domain model - the compiler's input.

use super::{Association, Class, Enumeration, Generalization};
use crate::error::Error;
use serde::{Deserialize, Serialize};

/// A complete structural model: classes, enumerations, associations, and
/// generalizations.
///
/// Owned by the caller; the compiler only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DomainModel {
    /// Model name.
    pub name: String,
    /// Class definitions.
    #[serde(default)]
    pub classes: Vec<Class>,
    /// Enumeration definitions.
    #[serde(default)]
    pub enumerations: Vec<Enumeration>,
    /// Associations between classes.
    #[serde(default)]
    pub associations: Vec<Association>,
    /// Generalizations between classes.
    #[serde(default)]
    pub generalizations: Vec<Generalization>,
}

impl DomainModel {
    /// Create an empty model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a class.
    pub fn with_class(mut self, class: Class) -> Self {
        self.classes.push(class);
        self
    }

    /// Add an enumeration.
    pub fn with_enumeration(mut self, enumeration: Enumeration) -> Self {
        self.enumerations.push(enumeration);
        self
    }

    /// Add an association.
    pub fn with_association(mut self, association: Association) -> Self {
        self.associations.push(association);
        self
    }

    /// Add a generalization.
    pub fn with_generalization(mut self, generalization: Generalization) -> Self {
        self.generalizations.push(generalization);
        self
    }

    /// Declare `specific` a subclass of `general`.
    pub fn with_inheritance(self, general: impl Into<String>, specific: impl Into<String>) -> Self {
        self.with_generalization(Generalization::new(general, specific))
    }

    /// Get a class by name.
    pub fn get_class(&self, name: &str) -> Option<&Class> {
        self.classes.iter().find(|c| c.name == name)
    }

    /// Get an enumeration by name.
    pub fn get_enumeration(&self, name: &str) -> Option<&Enumeration> {
        self.enumerations.iter().find(|e| e.name == name)
    }

    /// Serialize the model to JSON.
    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Deserialize a model from JSON.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(|e| Error::Deserialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Multiplicity, PrimitiveType, Property};

    fn sample_model() -> DomainModel {
        DomainModel::new("Library")
            .with_class(
                Class::new("Book").with_attribute(Property::primitive("title", PrimitiveType::String)),
            )
            .with_class(Class::new("Author"))
            .with_enumeration(Enumeration::new("Genre").with_literals(["FICTION", "POETRY"]))
            .with_association(
                Association::new("BookAuthor")
                    .with_role("authors", "Author", Multiplicity::unbounded(1))
                    .with_role("books", "Book", Multiplicity::many()),
            )
    }

    #[test]
    fn test_model_builder() {
        let model = sample_model();

        assert_eq!(model.classes.len(), 2);
        assert!(model.get_class("Book").is_some());
        assert!(model.get_class("Shelf").is_none());
        assert!(model.get_enumeration("Genre").is_some());
    }

    #[test]
    fn test_json_roundtrip() {
        let model = sample_model();
        let json = model.to_json().unwrap();
        let decoded = DomainModel::from_json(&json).unwrap();

        assert_eq!(model, decoded);
    }

    #[test]
    fn test_from_json_minimal() {
        let model = DomainModel::from_json(r#"{"name": "Empty"}"#).unwrap();
        assert_eq!(model.name, "Empty");
        assert!(model.classes.is_empty());
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let result = DomainModel::from_json("{ not json");
        assert!(matches!(result, Err(Error::Deserialization(_))));
    }
}
