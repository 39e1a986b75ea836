//! Creation-contract descriptors.

use crate::model::PrimitiveType;
use crate::resolve::Cardinality;
use serde::Serialize;

/// Suffix appended to a class name to name its creation contract.
pub const CONTRACT_SUFFIX: &str = "Create";

/// Name of the creation contract of a class.
pub fn contract_name(class: &str) -> String {
    format!("{}{}", class, CONTRACT_SUFFIX)
}

/// The creation contract of one class.
///
/// Holds only the fields the class declares itself; inherited fields come from
/// the parent contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contract {
    /// Class name.
    pub class: String,
    /// Contract name, `<Class>Create`.
    pub name: String,
    /// Class of the parent contract, mirroring the direct general.
    pub parent_class: Option<String>,
    /// Name of the parent contract.
    pub parent: Option<String>,
    /// Abstract classes get a contract but no construction plan.
    pub is_abstract: bool,
    /// Own attributes first, then relationship fields.
    pub fields: Vec<ContractField>,
}

impl Contract {
    /// Get a field by name.
    pub fn field(&self, name: &str) -> Option<&ContractField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields contributed by attributes.
    pub fn attribute_fields(&self) -> impl Iterator<Item = &ContractField> {
        self.fields.iter().filter(|f| f.is_attribute())
    }

    /// Fields contributed by associations.
    pub fn relationship_fields(&self) -> impl Iterator<Item = &ContractField> {
        self.fields.iter().filter(|f| !f.is_attribute())
    }
}

/// A single field of a creation contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractField {
    /// Field name.
    pub name: String,
    /// Field type.
    pub ty: FieldType,
    /// Whether the field must be supplied.
    pub required: bool,
    /// Where the field comes from.
    pub origin: FieldOrigin,
}

impl ContractField {
    /// Check if the field comes from an attribute.
    pub fn is_attribute(&self) -> bool {
        matches!(self.origin, FieldOrigin::Attribute)
    }

    /// Check if the field carries the class's own foreign key.
    pub fn owns_reference(&self) -> bool {
        matches!(
            self.origin,
            FieldOrigin::Relationship {
                owns_reference: true,
                ..
            }
        )
    }
}

/// Type of a contract field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum FieldType {
    /// A primitive value.
    Primitive {
        /// The primitive type.
        primitive: PrimitiveType,
    },
    /// An enumeration literal.
    Enumeration {
        /// Enumeration name.
        name: String,
    },
    /// The id of one row of `class`.
    Reference {
        /// Referenced class.
        class: String,
    },
    /// A list of related rows of `class`.
    List {
        /// Related class.
        class: String,
        /// Element type.
        element: ElementType,
    },
}

impl FieldType {
    /// Check if the field holds a list.
    pub fn is_list(&self) -> bool {
        matches!(self, FieldType::List { .. })
    }
}

/// Element type of a relationship list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ElementType {
    /// Plain id of an existing row.
    ByReference,
    /// Tagged union: either `ByReference(id)` of an existing row, or
    /// `ByValue(contract)`, a nested creation payload for a new row.
    ByReferenceOrValue {
        /// Contract of the nested payload.
        contract: String,
    },
}

/// Where a contract field comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum FieldOrigin {
    /// An attribute declared on the class.
    Attribute,
    /// An association end of the class.
    Relationship {
        /// Association name.
        association: String,
        /// Shape from this class's point of view.
        cardinality: Cardinality,
        /// Whether this class holds the reference column.
        owns_reference: bool,
    },
}

/// A synthesized enumeration: a closed set of literals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumDef {
    /// Enumeration name.
    pub name: String,
    /// Literals in declaration order.
    pub literals: Vec<EnumLiteral>,
}

/// An enumeration literal. Its value equals its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumLiteral {
    /// Literal name.
    pub name: String,
    /// Generated value.
    pub value: String,
}

impl EnumLiteral {
    /// Create a literal whose value is its name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            value: name.clone(),
            name,
        }
    }
}
