//! Storage layout synthesis.

use super::layout::{
    ColumnDef, ColumnType, IdentityDef, JoinColumn, JoinTableDef, ParentRef, ReferenceColumn,
    StorageLayout, TableDef, DISCRIMINATOR_COLUMN, IDENTITY_COLUMN,
};
use crate::model::{AssociationEnd, AttributeType, BinaryAssociation, ClassNode, ModelIndex};
use crate::resolve::{Cardinality, ForeignKeyTable};
use std::collections::BTreeSet;
use tracing::{debug, instrument};

/// Table name for a class.
pub fn table_name(class: &str) -> String {
    class.to_lowercase()
}

fn identity_of(table: &str) -> String {
    format!("{}.{}", table, IDENTITY_COLUMN)
}

/// Derives tables, reference columns, and join tables from the model and the
/// foreign-key decisions.
///
/// Storage inheritance mirrors the generalization forest: a class with a
/// general is stored in its own table whose identity references the parent's.
pub struct StorageSynthesizer<'a> {
    index: &'a ModelIndex,
    decisions: &'a ForeignKeyTable,
}

impl<'a> StorageSynthesizer<'a> {
    /// Create a synthesizer over a model and its decisions.
    pub fn new(index: &'a ModelIndex, decisions: &'a ForeignKeyTable) -> Self {
        Self { index, decisions }
    }

    /// Build the storage layout.
    #[instrument(skip_all, fields(model = %self.index.name()))]
    pub fn synthesize(&self) -> StorageLayout {
        let tables: Vec<_> = self
            .index
            .classes()
            .iter()
            .map(|class| self.table(class))
            .collect();
        let join_tables = self.join_tables();

        debug!(
            tables = tables.len(),
            join_tables = join_tables.len(),
            "synthesized storage layout"
        );

        StorageLayout {
            tables,
            join_tables,
        }
    }

    fn table(&self, class: &ClassNode) -> TableDef {
        let parent = class.general.map(|general| {
            let name = self.index.class_name(general);
            ParentRef {
                class: name.to_string(),
                table: table_name(name),
            }
        });

        let identity = IdentityDef {
            column: IDENTITY_COLUMN.to_string(),
            auto_increment: parent.is_none(),
            references: parent.as_ref().map(|p| identity_of(&p.table)),
        };

        let discriminator = (class.general.is_none() && !class.specifics.is_empty())
            .then(|| DISCRIMINATOR_COLUMN.to_string());
        let polymorphic_identity = self
            .index
            .in_hierarchy(class.id)
            .then(|| table_name(&class.name));

        let mut columns = Vec::new();
        let mut references = Vec::new();

        for attr in &class.attributes {
            let nullable = !attr.is_required();
            match &attr.ty {
                AttributeType::Primitive(primitive) => columns.push(ColumnDef {
                    name: attr.name.clone(),
                    ty: ColumnType::Primitive(*primitive),
                    nullable,
                }),
                AttributeType::Enumeration(enumeration) => columns.push(ColumnDef {
                    name: attr.name.clone(),
                    ty: ColumnType::Enumeration(enumeration.clone()),
                    nullable,
                }),
                AttributeType::Class(target) => {
                    let target = self.index.class_name(*target);
                    references.push(ReferenceColumn {
                        name: format!("{}_id", attr.name),
                        source: format!("{}.{}", class.name, attr.name),
                        target_class: target.to_string(),
                        references: identity_of(&table_name(target)),
                        nullable,
                        unique: false,
                    });
                }
            }
        }

        for fk in self.decisions.owned_by(class.id) {
            references.push(ReferenceColumn {
                name: fk.column_name(),
                source: fk.association.clone(),
                target_class: fk.target_class.clone(),
                references: identity_of(&table_name(&fk.target_class)),
                nullable: !fk.required,
                unique: fk.cardinality == Cardinality::OneToOne,
            });
        }

        TableDef {
            class: class.name.clone(),
            name: table_name(&class.name),
            parent,
            identity,
            discriminator,
            polymorphic_identity,
            columns,
            references,
        }
    }

    fn join_tables(&self) -> Vec<JoinTableDef> {
        let mut used: BTreeSet<String> = self
            .index
            .classes()
            .iter()
            .map(|class| table_name(&class.name))
            .collect();
        let mut tables = Vec::new();

        for association in self.index.associations() {
            let needs_join = self
                .decisions
                .get(&association.name)
                .is_some_and(|decision| decision.is_join_table());
            if !needs_join {
                continue;
            }

            let table = self.join_table(association, &used);
            used.insert(table.name.clone());
            tables.push(table);
        }

        tables
    }

    fn join_table(&self, association: &BinaryAssociation, used: &BTreeSet<String>) -> JoinTableDef {
        let [first, second] = &association.ends;
        let self_join = first.class == second.class;

        let base = format!(
            "{}{}",
            table_name(self.index.class_name(first.class)),
            table_name(self.index.class_name(second.class))
        );
        let qualified = format!("{}_{}", base, association.name.to_lowercase());
        let mut name = if used.contains(&base) { qualified.clone() } else { base };
        let mut suffix = 2;
        while used.contains(&name) {
            name = format!("{}_{}", qualified, suffix);
            suffix += 1;
        }

        let column = |end: &AssociationEnd| {
            let class = self.index.class_name(end.class);
            let name = if self_join {
                format!("{}_id", end.role)
            } else {
                format!("{}_id", table_name(class))
            };
            JoinColumn {
                name,
                class: class.to_string(),
                references: identity_of(&table_name(class)),
            }
        };

        JoinTableDef {
            name,
            association: association.name.clone(),
            columns: [column(first), column(second)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Association, Class, DomainModel, Multiplicity, PrimitiveType, Property};
    use crate::resolve::ForeignKeyResolver;

    fn layout(model: &DomainModel) -> StorageLayout {
        let index = ModelIndex::build(model).unwrap();
        let decisions = ForeignKeyResolver::new().resolve_all(&index);
        StorageSynthesizer::new(&index, &decisions).synthesize()
    }

    fn company() -> DomainModel {
        DomainModel::new("Company")
            .with_class(
                Class::new("Person")
                    .with_attribute(Property::primitive("name", PrimitiveType::String))
                    .with_attribute(
                        Property::primitive("nickname", PrimitiveType::String)
                            .with_multiplicity(Multiplicity::optional()),
                    ),
            )
            .with_class(Class::new("Employee").with_attribute(Property::primitive("salary", PrimitiveType::Float)))
            .with_class(Class::new("Manager"))
            .with_class(Class::new("Department"))
            .with_inheritance("Person", "Employee")
            .with_inheritance("Employee", "Manager")
            .with_association(
                Association::new("EmployeeDepartment")
                    .with_role("department", "Department", Multiplicity::one())
                    .with_role("employees", "Employee", Multiplicity::many()),
            )
    }

    #[test]
    fn test_parent_chain_mirrors_generalizations() {
        let layout = layout(&company());

        let person = layout.table("Person").unwrap();
        assert!(person.is_root());
        assert!(person.identity.auto_increment);
        assert_eq!(person.discriminator.as_deref(), Some("type"));
        assert_eq!(person.polymorphic_identity.as_deref(), Some("person"));

        let manager = layout.table("Manager").unwrap();
        let parent = manager.parent.as_ref().unwrap();
        assert_eq!(parent.class, "Employee");
        assert!(!manager.identity.auto_increment);
        assert_eq!(manager.identity.references.as_deref(), Some("employee.id"));
        assert!(manager.discriminator.is_none());

        let department = layout.table("Department").unwrap();
        assert!(department.polymorphic_identity.is_none());
    }

    #[test]
    fn test_attribute_nullability() {
        let layout = layout(&company());
        let person = layout.table("Person").unwrap();

        assert!(!person.column("name").unwrap().nullable);
        assert!(person.column("nickname").unwrap().nullable);
    }

    #[test]
    fn test_reference_column_on_owner() {
        let layout = layout(&company());

        let employee = layout.table("Employee").unwrap();
        let column = employee.reference("department_id").unwrap();
        assert_eq!(column.references, "department.id");
        assert_eq!(column.source, "EmployeeDepartment");
        assert!(!column.nullable);
        assert!(!column.unique);

        assert!(layout.table("Department").unwrap().references.is_empty());
        assert!(layout.table("Manager").unwrap().references.is_empty());
    }

    #[test]
    fn test_one_to_one_reference_is_unique() {
        let model = DomainModel::new("Devices")
            .with_class(Class::new("ADevice"))
            .with_class(Class::new("BSerial"))
            .with_association(
                Association::new("DeviceSerial")
                    .with_role("device", "ADevice", Multiplicity::optional())
                    .with_role("serial", "BSerial", Multiplicity::one()),
            );
        let layout = layout(&model);

        let column = layout.table("ADevice").unwrap().reference("serial_id").unwrap();
        assert!(column.unique);
        assert!(!column.nullable);
    }

    #[test]
    fn test_single_join_table_per_many_to_many() {
        let model = DomainModel::new("Campus")
            .with_class(Class::new("Student"))
            .with_class(Class::new("Course"))
            .with_association(
                Association::new("Enrollment")
                    .with_role("students", "Student", Multiplicity::many())
                    .with_role("courses", "Course", Multiplicity::many()),
            );
        let layout = layout(&model);

        assert_eq!(layout.join_tables.len(), 1);
        let join = layout.join_table("coursestudent").unwrap();
        assert_eq!(join.association, "Enrollment");
        assert_eq!(join.columns[0].name, "course_id");
        assert_eq!(join.columns[1].name, "student_id");
        assert!(layout.tables.iter().all(|t| t.references.is_empty()));
    }

    #[test]
    fn test_join_table_name_collision() {
        let model = DomainModel::new("Campus")
            .with_class(Class::new("Student"))
            .with_class(Class::new("Course"))
            .with_association(
                Association::new("Enrollment")
                    .with_role("students", "Student", Multiplicity::many())
                    .with_role("courses", "Course", Multiplicity::many()),
            )
            .with_association(
                Association::new("Waitlist")
                    .with_role("waiting", "Student", Multiplicity::many())
                    .with_role("waitlisted", "Course", Multiplicity::many()),
            );
        let layout = layout(&model);

        assert!(layout.join_table("coursestudent").is_some());
        assert_eq!(
            layout.join_table_for("Waitlist").unwrap().name,
            "coursestudent_waitlist"
        );
    }

    #[test]
    fn test_join_table_avoids_class_table_names() {
        let model = DomainModel::new("Company")
            .with_class(Class::new("Manager"))
            .with_class(Class::new("Project"))
            .with_class(Class::new("ManagerProject"))
            .with_association(
                Association::new("Staffing")
                    .with_role("managers", "Manager", Multiplicity::many())
                    .with_role("projects", "Project", Multiplicity::many()),
            );
        let layout = layout(&model);

        let join = layout.join_table_for("Staffing").unwrap();
        assert_eq!(join.name, "managerproject_staffing");

        let mut names: Vec<_> = layout
            .tables
            .iter()
            .map(|t| t.name.as_str())
            .chain(layout.join_tables.iter().map(|t| t.name.as_str()))
            .collect();
        let total = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn test_self_join_columns_use_roles() {
        let model = DomainModel::new("Social")
            .with_class(Class::new("User"))
            .with_association(
                Association::new("Follows")
                    .with_role("followers", "User", Multiplicity::many())
                    .with_role("following", "User", Multiplicity::many()),
            );
        let layout = layout(&model);
        let join = layout.join_table("useruser").unwrap();

        assert_eq!(join.columns[0].name, "followers_id");
        assert_eq!(join.columns[1].name, "following_id");
    }
}
