//! Backforge Core - UML structural model to backend descriptors.
//!
//! This crate turns a verified structural model (classes, enumerations,
//! binary associations, generalizations) into:
//!
//! - a foreign-key decision per association ([`resolve`]),
//! - a relational storage layout with joined-table inheritance ([`storage`]),
//! - per-class creation contracts ([`contract`]),
//! - construction plans flattening the generalization chain ([`construction`]).
//!
//! ```
//! use backforge_core::{compile, Association, Class, CompileConfig, DomainModel, Multiplicity};
//!
//! # fn main() -> backforge_core::Result<()> {
//! let model = DomainModel::new("Shop")
//!     .with_class(Class::new("Customer"))
//!     .with_class(Class::new("Order"))
//!     .with_association(
//!         Association::new("Orders")
//!             .with_role("customer", "Customer", Multiplicity::one())
//!             .with_role("orders", "Order", Multiplicity::many()),
//!     );
//!
//! let compiled = compile(&model, CompileConfig::default())?;
//! assert_eq!(compiled.storage.table("Order").unwrap().references[0].name, "customer_id");
//! # Ok(())
//! # }
//! ```

pub mod compiler;
pub mod config;
pub mod construction;
pub mod contract;
pub mod error;
pub mod model;
pub mod resolve;
pub mod storage;

mod verify;

pub use compiler::{CompiledModel, Compiler};
pub use config::CompileConfig;
pub use construction::{Binding, ConstructionBuilder, ConstructionPlan, ConstructorArg};
pub use contract::{
    Contract, ContractField, ContractSet, ContractSynthesizer, ElementType, EnumDef, FieldOrigin,
    FieldType,
};
pub use error::{Error, ModelError};
pub use model::{
    Association, Class, DomainModel, Enumeration, Generalization, ModelIndex, Multiplicity,
    PrimitiveType, Property, TypeRef, UpperBound,
};
pub use resolve::{Cardinality, ForeignKey, ForeignKeyDecision, ForeignKeyResolver, ForeignKeyTable};
pub use storage::{StorageLayout, StorageSynthesizer, TableDef};

/// Result type for backforge operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Compile a model with the given options.
pub fn compile(model: &DomainModel, config: CompileConfig) -> Result<CompiledModel> {
    Compiler::new(config).compile(model)
}
