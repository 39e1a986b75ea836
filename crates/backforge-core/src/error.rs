//! Core error types.

use crate::model::Multiplicity;
use thiserror::Error;

/// Compiler errors.
#[derive(Debug, Error)]
pub enum Error {
    /// The model violates a structural precondition.
    #[error("invalid model: {0}")]
    Model(#[from] ModelError),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Deserialization error.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// Invalid compile configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Structural precondition violations found before synthesis.
///
/// These are fatal: a model that fails verification is never compiled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// A property has no type.
    #[error("property '{property}' of '{owner}' has no type")]
    UntypedProperty {
        /// Class or association declaring the property.
        owner: String,
        /// Property name.
        property: String,
    },

    /// Two types share a name.
    #[error("duplicate type name '{0}'")]
    DuplicateType(String),

    /// Two classes map to the same table name.
    #[error("classes '{first}' and '{second}' both map to table '{table}'")]
    DuplicateTable {
        /// Shared table name.
        table: String,
        /// First class.
        first: String,
        /// Second class.
        second: String,
    },

    /// Two associations share a name.
    #[error("duplicate association name '{0}'")]
    DuplicateAssociation(String),

    /// An attribute name is declared twice on a class.
    #[error("duplicate attribute '{attribute}' on class '{class}'")]
    DuplicateAttribute {
        /// Class name.
        class: String,
        /// Attribute name.
        attribute: String,
    },

    /// An enumeration literal is declared twice.
    #[error("duplicate literal '{literal}' in enumeration '{enumeration}'")]
    DuplicateLiteral {
        /// Enumeration name.
        enumeration: String,
        /// Literal name.
        literal: String,
    },

    /// A reference to a class that does not exist.
    #[error("'{referenced_by}' references unknown class '{class}'")]
    UnknownClass {
        /// Element holding the reference.
        referenced_by: String,
        /// Missing class name.
        class: String,
    },

    /// A reference to an enumeration that does not exist.
    #[error("'{referenced_by}' references unknown enumeration '{enumeration}'")]
    UnknownEnumeration {
        /// Element holding the reference.
        referenced_by: String,
        /// Missing enumeration name.
        enumeration: String,
    },

    /// An association end typed by something other than a class.
    #[error("end '{end}' of association '{association}' is not typed by a class")]
    EndNotClass {
        /// Association name.
        association: String,
        /// End (role) name.
        end: String,
    },

    /// An association end without multiplicity.
    #[error("end '{end}' of association '{association}' has no multiplicity")]
    MissingMultiplicity {
        /// Association name.
        association: String,
        /// End (role) name.
        end: String,
    },

    /// A multiplicity with `min > max` or `max == 0`.
    #[error("property '{property}' of '{owner}' has invalid multiplicity {multiplicity}")]
    InvalidMultiplicity {
        /// Class or association declaring the property.
        owner: String,
        /// Property name.
        property: String,
        /// The offending multiplicity.
        multiplicity: Multiplicity,
    },

    /// A class with more than one direct general.
    #[error("class '{class}' has more than one general: '{first}' and '{second}'")]
    MultipleGenerals {
        /// Class name.
        class: String,
        /// First general found.
        first: String,
        /// Second general found.
        second: String,
    },

    /// The generalization relation contains a cycle.
    #[error("generalization cycle through class '{0}'")]
    GeneralizationCycle(String),

    /// A field name declared by an ancestor is declared again down the chain.
    #[error("field '{field}' of class '{class}' is already declared by '{declared_by}'")]
    DuplicateField {
        /// Class redeclaring the field.
        class: String,
        /// Field name.
        field: String,
        /// Class (the same one or an ancestor) that declared it first.
        declared_by: String,
    },

    /// Two fields of a class map to the same storage column.
    #[error("column '{column}' of table '{table}' is produced by both '{first}' and '{second}'")]
    DuplicateColumn {
        /// Table name.
        table: String,
        /// Column name.
        column: String,
        /// Field producing the column first.
        first: String,
        /// Field producing it again.
        second: String,
    },
}
