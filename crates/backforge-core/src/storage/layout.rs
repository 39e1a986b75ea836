//! Storage layout descriptors.

use crate::model::PrimitiveType;
use serde::Serialize;

/// Name of the identity column every table carries.
pub const IDENTITY_COLUMN: &str = "id";

/// Name of the discriminator column on hierarchy roots.
pub const DISCRIMINATOR_COLUMN: &str = "type";

/// Storage layout of a whole model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StorageLayout {
    /// One table per class, ordered by class name.
    pub tables: Vec<TableDef>,
    /// One join table per many-to-many association, ordered by association name.
    pub join_tables: Vec<JoinTableDef>,
}

impl StorageLayout {
    /// Get the table of a class.
    pub fn table(&self, class: &str) -> Option<&TableDef> {
        self.tables.iter().find(|t| t.class == class)
    }

    /// Get a join table by table name.
    pub fn join_table(&self, name: &str) -> Option<&JoinTableDef> {
        self.join_tables.iter().find(|t| t.name == name)
    }

    /// Get the join table for an association.
    pub fn join_table_for(&self, association: &str) -> Option<&JoinTableDef> {
        self.join_tables.iter().find(|t| t.association == association)
    }
}

/// Storage of a single class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableDef {
    /// Class name.
    pub class: String,
    /// Table name.
    pub name: String,
    /// Storage parent mirroring the class's direct general, if any.
    pub parent: Option<ParentRef>,
    /// Identity column.
    pub identity: IdentityDef,
    /// Discriminator column, present on hierarchy roots with descendants.
    pub discriminator: Option<String>,
    /// Value stored in the discriminator for rows of this class.
    pub polymorphic_identity: Option<String>,
    /// Columns for the class's own attributes.
    pub columns: Vec<ColumnDef>,
    /// Reference columns for foreign keys held by this class.
    pub references: Vec<ReferenceColumn>,
}

impl TableDef {
    /// Check if this table is the root of its storage hierarchy.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Get an attribute column by name.
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Get a reference column by name.
    pub fn reference(&self, name: &str) -> Option<&ReferenceColumn> {
        self.references.iter().find(|c| c.name == name)
    }
}

/// The storage parent of a mapped subclass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParentRef {
    /// Parent class name.
    pub class: String,
    /// Parent table name.
    pub table: String,
}

/// Identity (primary key) column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityDef {
    /// Column name.
    pub column: String,
    /// Roots generate their own ids.
    pub auto_increment: bool,
    /// Subclasses share the parent's id: `<parent table>.id`.
    pub references: Option<String>,
}

/// Column type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "name")]
pub enum ColumnType {
    /// A primitive value.
    Primitive(PrimitiveType),
    /// An enumeration, stored by literal name.
    Enumeration(String),
}

/// A column holding one of the class's own attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDef {
    /// Column name.
    pub name: String,
    /// Column type.
    pub ty: ColumnType,
    /// Whether the column accepts nulls.
    pub nullable: bool,
}

/// A column referencing another table's identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceColumn {
    /// Column name, `<role>_id`.
    pub name: String,
    /// Association (or class-typed attribute) the column comes from.
    pub source: String,
    /// Referenced class.
    pub target_class: String,
    /// Referenced column, `<table>.id`.
    pub references: String,
    /// Whether the column accepts nulls.
    pub nullable: bool,
    /// One-to-one references are unique.
    pub unique: bool,
}

/// Join table for a many-to-many association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinTableDef {
    /// Table name.
    pub name: String,
    /// Association name.
    pub association: String,
    /// One reference column per participant, in resolved end order. Together
    /// they form the primary key.
    pub columns: [JoinColumn; 2],
}

/// A join-table column referencing one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinColumn {
    /// Column name.
    pub name: String,
    /// Participant class.
    pub class: String,
    /// Referenced column, `<table>.id`.
    pub references: String,
}
