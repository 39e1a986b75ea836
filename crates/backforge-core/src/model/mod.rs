//! Structural model consumed by the compiler.
//!
//! The input types ([`DomainModel`], [`Class`], [`Association`], ...) reference
//! each other by name and can be built in code or loaded from JSON. Before
//! synthesis they are verified and rebuilt into a [`ModelIndex`]: an arena of
//! classes with explicit parent pointers and resolved association ends.

mod association;
mod class;
mod domain;
pub mod index;
mod multiplicity;
mod property;
mod types;

pub use association::{Association, Generalization};
pub use class::{Class, Enumeration};
pub use domain::DomainModel;
pub use index::{
    AssociationEnd, Attribute, AttributeType, BinaryAssociation, ClassId, ClassNode, ModelIndex,
    Side,
};
pub use multiplicity::{Multiplicity, UpperBound};
pub use property::Property;
pub use types::{PrimitiveType, TypeRef};
