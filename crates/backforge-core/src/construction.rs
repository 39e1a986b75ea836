//! Construction plans.
//!
//! A plan says how a creation payload for a class turns into constructor
//! arguments: which contract field feeds which parameter, walking the
//! generalization chain from the root down to the class itself.

use crate::contract::{ContractField, ContractSet, FieldType};
use crate::model::{ClassId, ModelIndex};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, instrument, warn};

/// How a constructor argument is bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Binding {
    /// A plain attribute value.
    Attribute,
    /// A reference id stored on the class's own table.
    ForeignKey,
    /// A relationship applied after construction.
    Link,
}

/// A single `(source field, constructor parameter)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstructorArg {
    /// Field of the creation contract the value is read from.
    pub source_field: String,
    /// Constructor parameter receiving the value.
    pub parameter: String,
    /// Class declaring the field.
    pub declared_by: String,
    /// How the value is bound.
    pub binding: Binding,
}

/// Ordered constructor arguments for one concrete class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstructionPlan {
    /// Class being constructed.
    pub class: String,
    /// Creation contract the arguments are read from.
    pub contract: String,
    /// Arguments, ancestors first.
    pub args: Vec<ConstructorArg>,
}

impl ConstructionPlan {
    /// Constructor parameters in order.
    pub fn parameters(&self) -> impl Iterator<Item = &str> {
        self.args.iter().map(|arg| arg.parameter.as_str())
    }

    /// Get the argument bound to a parameter.
    pub fn arg(&self, parameter: &str) -> Option<&ConstructorArg> {
        self.args.iter().find(|arg| arg.parameter == parameter)
    }

    /// Arguments applied after construction.
    pub fn links(&self) -> impl Iterator<Item = &ConstructorArg> {
        self.args.iter().filter(|arg| arg.binding == Binding::Link)
    }
}

/// Builds construction plans from the class arena and the contract set.
pub struct ConstructionBuilder<'a> {
    index: &'a ModelIndex,
    contracts: &'a ContractSet,
}

impl<'a> ConstructionBuilder<'a> {
    /// Create a builder.
    pub fn new(index: &'a ModelIndex, contracts: &'a ContractSet) -> Self {
        Self { index, contracts }
    }

    /// Plans for every non-abstract class, ordered by class name.
    #[instrument(skip_all, fields(model = %self.index.name()))]
    pub fn build_all(&self) -> Vec<ConstructionPlan> {
        let plans: Vec<_> = self
            .index
            .classes()
            .iter()
            .filter(|class| !class.is_abstract)
            .map(|class| self.flatten(class.id))
            .collect();

        debug!(plans = plans.len(), "built construction plans");
        plans
    }

    /// Flatten the generalization chain of `class` into one plan.
    ///
    /// Ancestors contribute, root first, their attributes and the references
    /// they hold; their collection links stay with the ancestor. The class
    /// itself contributes its attributes and then its relationship fields.
    pub fn flatten(&self, class: ClassId) -> ConstructionPlan {
        let name = self.index.class_name(class).to_string();
        let mut args = Vec::new();
        let mut seen = BTreeSet::new();

        for ancestor in self.index.ancestors(class) {
            let ancestor = self.index.class_name(ancestor);
            let Some(contract) = self.contracts.get(ancestor) else {
                continue;
            };
            let inherited = contract
                .fields
                .iter()
                .filter(|field| field.is_attribute() || field.owns_reference());
            for field in inherited {
                push_arg(&mut args, &mut seen, ancestor, field);
            }
        }

        let contract = self.contracts.get(&name);
        if let Some(contract) = contract {
            for field in contract.attribute_fields().chain(contract.relationship_fields()) {
                push_arg(&mut args, &mut seen, &name, field);
            }
        }

        ConstructionPlan {
            contract: contract.map(|c| c.name.clone()).unwrap_or_default(),
            class: name,
            args,
        }
    }
}

fn push_arg(
    args: &mut Vec<ConstructorArg>,
    seen: &mut BTreeSet<String>,
    declared_by: &str,
    field: &ContractField,
) {
    let (parameter, binding) = bind(field);
    if !seen.insert(parameter.clone()) {
        warn!(class = %declared_by, %parameter, "parameter already bound, skipping");
        return;
    }

    args.push(ConstructorArg {
        source_field: field.name.clone(),
        parameter,
        declared_by: declared_by.to_string(),
        binding,
    });
}

fn bind(field: &ContractField) -> (String, Binding) {
    let reference_column = format!("{}_id", field.name);
    match (&field.ty, field.is_attribute()) {
        (FieldType::Reference { .. }, true) => (reference_column, Binding::ForeignKey),
        (_, true) => (field.name.clone(), Binding::Attribute),
        _ if field.owns_reference() => (reference_column, Binding::ForeignKey),
        _ => (field.name.clone(), Binding::Link),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompileConfig;
    use crate::contract::ContractSynthesizer;
    use crate::model::{Association, Class, DomainModel, Multiplicity, PrimitiveType, Property};
    use crate::resolve::ForeignKeyResolver;
    use pretty_assertions::assert_eq;

    fn company() -> DomainModel {
        DomainModel::new("Company")
            .with_class(
                Class::new("Person")
                    .with_abstract()
                    .with_attribute(Property::primitive("name", PrimitiveType::String)),
            )
            .with_class(Class::new("Employee").with_attribute(Property::primitive("salary", PrimitiveType::Float)))
            .with_class(Class::new("Manager").with_attribute(Property::primitive("level", PrimitiveType::Integer)))
            .with_class(Class::new("Department").with_attribute(Property::primitive("title", PrimitiveType::String)))
            .with_class(Class::new("Project"))
            .with_inheritance("Person", "Employee")
            .with_inheritance("Employee", "Manager")
            .with_association(
                Association::new("EmployeeDepartment")
                    .with_role("department", "Department", Multiplicity::one())
                    .with_role("employees", "Employee", Multiplicity::many()),
            )
            .with_association(
                Association::new("ManagerProject")
                    .with_role("managers", "Manager", Multiplicity::many())
                    .with_role("projects", "Project", Multiplicity::many()),
            )
    }

    fn plans(model: &DomainModel) -> Vec<ConstructionPlan> {
        let index = ModelIndex::build(model).unwrap();
        let decisions = ForeignKeyResolver::new().resolve_all(&index);
        let contracts = ContractSynthesizer::new(&index, &decisions, &CompileConfig::default()).synthesize();
        ConstructionBuilder::new(&index, &contracts).build_all()
    }

    fn plan<'p>(plans: &'p [ConstructionPlan], class: &str) -> &'p ConstructionPlan {
        plans.iter().find(|p| p.class == class).unwrap()
    }

    #[test]
    fn test_abstract_classes_have_no_plan() {
        let plans = plans(&company());
        let classes: Vec<_> = plans.iter().map(|p| p.class.as_str()).collect();

        assert_eq!(classes, ["Department", "Employee", "Manager", "Project"]);
    }

    #[test]
    fn test_manager_plan_root_to_leaf() {
        let plans = plans(&company());
        let manager = plan(&plans, "Manager");

        assert_eq!(manager.contract, "ManagerCreate");
        let parameters: Vec<_> = manager.parameters().collect();
        assert_eq!(
            parameters,
            ["name", "salary", "department_id", "level", "projects"]
        );
        assert_eq!(manager.arg("name").unwrap().declared_by, "Person");
        assert_eq!(manager.arg("level").unwrap().declared_by, "Manager");
    }

    #[test]
    fn test_ancestor_owned_reference_is_flattened() {
        let plans = plans(&company());
        let manager = plan(&plans, "Manager");

        let arg = manager.arg("department_id").unwrap();
        assert_eq!(arg.source_field, "department");
        assert_eq!(arg.declared_by, "Employee");
        assert_eq!(arg.binding, Binding::ForeignKey);
        assert!(manager.arg("department").is_none());
    }

    #[test]
    fn test_ancestor_links_are_not_flattened() {
        let model = company().with_association(
            Association::new("Watching")
                .with_role("watchers", "Employee", Multiplicity::many())
                .with_role("watched", "Project", Multiplicity::many()),
        );
        let plans = plans(&model);

        assert!(plan(&plans, "Employee").arg("watched").is_some());
        assert!(plan(&plans, "Manager").arg("watched").is_none());
    }

    #[test]
    fn test_required_inherited_fields_reach_the_plan() {
        let model = company();
        let index = ModelIndex::build(&model).unwrap();
        let decisions = ForeignKeyResolver::new().resolve_all(&index);
        let contracts = ContractSynthesizer::new(&index, &decisions, &CompileConfig::default()).synthesize();
        let manager = index.class_id("Manager").unwrap();
        let plan = ConstructionBuilder::new(&index, &contracts).flatten(manager);

        for field in contracts.effective_fields("Manager") {
            if field.required {
                assert!(
                    plan.args.iter().any(|arg| arg.source_field == field.name),
                    "{} missing from plan",
                    field.name
                );
            }
        }
    }

    #[test]
    fn test_owned_reference_binds_to_id_parameter() {
        let plans = plans(&company());
        let employee = plan(&plans, "Employee");

        let arg = employee.arg("department_id").unwrap();
        assert_eq!(arg.source_field, "department");
        assert_eq!(arg.binding, Binding::ForeignKey);
    }

    #[test]
    fn test_collections_are_links() {
        let plans = plans(&company());

        let links: Vec<_> = plan(&plans, "Department")
            .links()
            .map(|arg| arg.parameter.as_str())
            .collect();
        assert_eq!(links, ["employees"]);

        let links: Vec<_> = plan(&plans, "Project")
            .links()
            .map(|arg| arg.source_field.as_str())
            .collect();
        assert_eq!(links, ["managers"]);
    }

    #[test]
    fn test_parameters_are_unique() {
        for plan in plans(&company()) {
            let parameters: Vec<_> = plan.parameters().collect();
            let unique: BTreeSet<_> = parameters.iter().collect();
            assert_eq!(parameters.len(), unique.len(), "{}", plan.class);
        }
    }

    #[test]
    fn test_class_typed_attribute_binds_as_foreign_key() {
        let model = DomainModel::new("Shop")
            .with_class(Class::new("Customer"))
            .with_class(Class::new("Order").with_attribute(Property::new("buyer", crate::model::TypeRef::class("Customer"))));
        let plans = plans(&model);

        let arg = plan(&plans, "Order").arg("buyer_id").unwrap();
        assert_eq!(arg.source_field, "buyer");
        assert_eq!(arg.binding, Binding::ForeignKey);
    }
}
