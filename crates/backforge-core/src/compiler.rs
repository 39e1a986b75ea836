//! The compile pipeline.

use crate::config::CompileConfig;
use crate::construction::{ConstructionBuilder, ConstructionPlan};
use crate::contract::{ContractSet, ContractSynthesizer};
use crate::error::Error;
use crate::model::{DomainModel, ModelIndex};
use crate::resolve::{ForeignKeyResolver, ForeignKeyTable};
use crate::storage::{StorageLayout, StorageSynthesizer};
use crate::verify;
use serde::Serialize;
use tracing::{info, instrument};

/// Everything produced from one domain model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompiledModel {
    /// Model name.
    pub name: String,
    /// One foreign-key decision per binary association.
    pub decisions: ForeignKeyTable,
    /// Tables and join tables.
    pub storage: StorageLayout,
    /// Creation contracts and enumerations.
    pub contracts: ContractSet,
    /// Construction plans for concrete classes, ordered by class name.
    pub construction: Vec<ConstructionPlan>,
    /// Associations skipped because they do not have exactly two ends.
    pub unsupported_associations: Vec<String>,
}

impl CompiledModel {
    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Get the construction plan of a class.
    pub fn plan(&self, class: &str) -> Option<&ConstructionPlan> {
        self.construction.iter().find(|plan| plan.class == class)
    }
}

/// Runs verify, index, resolve, storage, contract, and construction stages in
/// a single pass.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    config: CompileConfig,
}

impl Compiler {
    /// Create a compiler with the given options.
    pub fn new(config: CompileConfig) -> Self {
        Self { config }
    }

    /// The options this compiler runs with.
    pub fn config(&self) -> &CompileConfig {
        &self.config
    }

    /// Compile a domain model.
    #[instrument(skip_all, fields(model = %model.name))]
    pub fn compile(&self, model: &DomainModel) -> Result<CompiledModel, Error> {
        let index = ModelIndex::build(model)?;
        let decisions = ForeignKeyResolver::new().resolve_all(&index);
        verify::verify_columns(&index, &decisions)?;
        let storage = StorageSynthesizer::new(&index, &decisions).synthesize();
        let contracts = ContractSynthesizer::new(&index, &decisions, &self.config).synthesize();
        let construction = ConstructionBuilder::new(&index, &contracts).build_all();

        info!(
            classes = index.classes().len(),
            decisions = decisions.len(),
            join_tables = storage.join_tables.len(),
            unsupported = index.unsupported_associations().len(),
            "compiled model"
        );

        Ok(CompiledModel {
            name: index.name().to_string(),
            unsupported_associations: index.unsupported_associations().to_vec(),
            decisions,
            storage,
            contracts,
            construction,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use crate::model::{Association, Class, Multiplicity, PrimitiveType, Property};

    #[test]
    fn test_compile_empty_model() {
        let compiled = Compiler::default().compile(&DomainModel::new("Empty")).unwrap();

        assert_eq!(compiled.name, "Empty");
        assert!(compiled.decisions.is_empty());
        assert!(compiled.storage.tables.is_empty());
        assert!(compiled.construction.is_empty());
    }

    #[test]
    fn test_compile_reports_model_errors() {
        let model = DomainModel::new("Broken").with_association(
            Association::new("Dangling")
                .with_role("a", "Missing", Multiplicity::one())
                .with_role("b", "Missing", Multiplicity::one()),
        );

        let err = Compiler::default().compile(&model).unwrap_err();
        assert!(matches!(err, Error::Model(ModelError::UnknownClass { .. })));
    }

    #[test]
    fn test_unsupported_associations_are_reported() {
        let model = DomainModel::new("Triple")
            .with_class(Class::new("A"))
            .with_class(Class::new("B"))
            .with_class(Class::new("C"))
            .with_association(
                Association::new("Ternary")
                    .with_role("a", "A", Multiplicity::many())
                    .with_role("b", "B", Multiplicity::many())
                    .with_role("c", "C", Multiplicity::many()),
            );

        let compiled = Compiler::default().compile(&model).unwrap();
        assert_eq!(compiled.unsupported_associations, ["Ternary"]);
        assert!(compiled.decisions.get("Ternary").is_none());
        assert!(compiled.storage.join_tables.is_empty());
    }

    #[test]
    fn test_to_json_contains_sections() {
        let model = DomainModel::new("Tiny")
            .with_class(Class::new("Item").with_attribute(Property::primitive("label", PrimitiveType::String)));

        let json = Compiler::default().compile(&model).unwrap().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["name"], "Tiny");
        assert_eq!(value["storage"]["tables"][0]["name"], "item");
        assert_eq!(value["contracts"]["contracts"]["Item"]["name"], "ItemCreate");
        assert_eq!(value["construction"][0]["args"][0]["parameter"], "label");
    }

    #[test]
    fn test_duplicate_storage_column_is_rejected() {
        let model = DomainModel::new("Clash")
            .with_class(Class::new("Department"))
            .with_class(
                Class::new("Employee")
                    .with_attribute(Property::primitive("department_id", PrimitiveType::Integer)),
            )
            .with_association(
                Association::new("EmployeeDepartment")
                    .with_role("department", "Department", Multiplicity::one())
                    .with_role("employees", "Employee", Multiplicity::many()),
            );

        let err = Compiler::default().compile(&model).unwrap_err();
        assert!(matches!(
            err,
            Error::Model(ModelError::DuplicateColumn { ref column, .. }) if column == "department_id"
        ));
    }

    #[test]
    fn test_join_table_never_shadows_class_table() {
        let model = DomainModel::new("Company")
            .with_class(Class::new("Manager"))
            .with_class(Class::new("Project"))
            .with_class(Class::new("ManagerProject"))
            .with_association(
                Association::new("Staffing")
                    .with_role("managers", "Manager", Multiplicity::many())
                    .with_role("projects", "Project", Multiplicity::many()),
            );

        let compiled = Compiler::default().compile(&model).unwrap();
        let tables: Vec<_> = compiled.storage.tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(tables, ["manager", "managerproject", "project"]);
        assert_eq!(compiled.storage.join_tables[0].name, "managerproject_staffing");
    }
}
