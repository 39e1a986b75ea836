//! Structural precondition checks.
//!
//! Run before any synthesis. A model that fails here is never compiled.

use crate::error::ModelError;
use crate::model::{AttributeType, Class, DomainModel, Enumeration, ModelIndex, Property, TypeRef};
use crate::resolve::ForeignKeyTable;
use crate::storage::{table_name, DISCRIMINATOR_COLUMN, IDENTITY_COLUMN};
use std::collections::{HashMap, HashSet};

/// Check the input model: names, type references, multiplicities, and the
/// generalization forest.
pub(crate) fn verify_model(model: &DomainModel) -> Result<(), ModelError> {
    verify_type_names(model)?;
    verify_table_names(model)?;

    for class in &model.classes {
        verify_class(model, class)?;
    }

    for enumeration in &model.enumerations {
        verify_enumeration(enumeration)?;
    }

    verify_associations(model)?;
    verify_generalizations(model)?;

    Ok(())
}

/// Check that no field name occurs twice along any generalization chain,
/// counting both attributes and relationship fields.
pub(crate) fn verify_fields(index: &ModelIndex) -> Result<(), ModelError> {
    for class in index.classes() {
        let mut seen: HashMap<String, &str> = HashMap::new();

        for id in index.lineage(class.id) {
            let declaring = index.class(id);

            let attribute_names = declaring.attributes.iter().map(|a| a.name.clone());
            let relationship_names = index
                .associations_of(id)
                .map(|(association, side)| association.end(side.opposite()).role.clone());

            for field in attribute_names.chain(relationship_names) {
                if let Some(declared_by) = seen.get(&field) {
                    return Err(ModelError::DuplicateField {
                        class: declaring.name.clone(),
                        field,
                        declared_by: declared_by.to_string(),
                    });
                }
                seen.insert(field, &declaring.name);
            }
        }
    }

    Ok(())
}

fn verify_type_names(model: &DomainModel) -> Result<(), ModelError> {
    let mut names = HashSet::new();

    let class_names = model.classes.iter().map(|c| &c.name);
    let enumeration_names = model.enumerations.iter().map(|e| &e.name);

    for name in class_names.chain(enumeration_names) {
        if !names.insert(name) {
            return Err(ModelError::DuplicateType(name.clone()));
        }
    }

    Ok(())
}

fn verify_table_names(model: &DomainModel) -> Result<(), ModelError> {
    let mut tables: HashMap<String, &str> = HashMap::new();

    for class in &model.classes {
        let table = table_name(&class.name);
        if let Some(first) = tables.get(&table) {
            return Err(ModelError::DuplicateTable {
                table,
                first: first.to_string(),
                second: class.name.clone(),
            });
        }
        tables.insert(table, &class.name);
    }

    Ok(())
}

/// Check that the columns each table will carry have distinct names: the
/// identity and discriminator, attribute columns (`<attr>_id` for class-typed
/// attributes), and `<role>_id` for every foreign key the class holds.
pub(crate) fn verify_columns(index: &ModelIndex, decisions: &ForeignKeyTable) -> Result<(), ModelError> {
    for class in index.classes() {
        let table = table_name(&class.name);
        let mut columns: HashMap<String, String> = HashMap::new();
        let mut produced = vec![(IDENTITY_COLUMN.to_string(), IDENTITY_COLUMN.to_string())];

        if class.general.is_none() && !class.specifics.is_empty() {
            produced.push((DISCRIMINATOR_COLUMN.to_string(), DISCRIMINATOR_COLUMN.to_string()));
        }
        for attr in &class.attributes {
            let column = match attr.ty {
                AttributeType::Class(_) => format!("{}_id", attr.name),
                _ => attr.name.clone(),
            };
            produced.push((column, attr.name.clone()));
        }
        for fk in decisions.owned_by(class.id) {
            produced.push((fk.column_name(), fk.role.clone()));
        }

        for (column, field) in produced {
            if let Some(first) = columns.get(&column) {
                return Err(ModelError::DuplicateColumn {
                    table,
                    column,
                    first: first.clone(),
                    second: field,
                });
            }
            columns.insert(column, field);
        }
    }

    Ok(())
}

fn verify_class(model: &DomainModel, class: &Class) -> Result<(), ModelError> {
    let mut names = HashSet::new();

    for attr in &class.attributes {
        if !names.insert(&attr.name) {
            return Err(ModelError::DuplicateAttribute {
                class: class.name.clone(),
                attribute: attr.name.clone(),
            });
        }

        match &attr.ty {
            None => {
                return Err(ModelError::UntypedProperty {
                    owner: class.name.clone(),
                    property: attr.name.clone(),
                })
            }
            Some(TypeRef::Class(name)) if model.get_class(name).is_none() => {
                return Err(ModelError::UnknownClass {
                    referenced_by: format!("{}.{}", class.name, attr.name),
                    class: name.clone(),
                })
            }
            Some(TypeRef::Enumeration(name)) if model.get_enumeration(name).is_none() => {
                return Err(ModelError::UnknownEnumeration {
                    referenced_by: format!("{}.{}", class.name, attr.name),
                    enumeration: name.clone(),
                })
            }
            Some(_) => {}
        }

        verify_multiplicity(&class.name, attr)?;
    }

    Ok(())
}

fn verify_enumeration(enumeration: &Enumeration) -> Result<(), ModelError> {
    let mut literals = HashSet::new();

    for literal in &enumeration.literals {
        if !literals.insert(literal) {
            return Err(ModelError::DuplicateLiteral {
                enumeration: enumeration.name.clone(),
                literal: literal.clone(),
            });
        }
    }

    Ok(())
}

fn verify_associations(model: &DomainModel) -> Result<(), ModelError> {
    let mut names = HashSet::new();

    for association in &model.associations {
        if !names.insert(&association.name) {
            return Err(ModelError::DuplicateAssociation(association.name.clone()));
        }

        // Non-binary associations are skipped later, not rejected.
        if !association.is_binary() {
            continue;
        }

        for end in &association.ends {
            let class_name = match &end.ty {
                None => {
                    return Err(ModelError::UntypedProperty {
                        owner: association.name.clone(),
                        property: end.name.clone(),
                    })
                }
                Some(TypeRef::Class(name)) => name,
                Some(_) => {
                    return Err(ModelError::EndNotClass {
                        association: association.name.clone(),
                        end: end.name.clone(),
                    })
                }
            };

            if model.get_class(class_name).is_none() {
                return Err(ModelError::UnknownClass {
                    referenced_by: format!("{}.{}", association.name, end.name),
                    class: class_name.clone(),
                });
            }

            if end.multiplicity.is_none() {
                return Err(ModelError::MissingMultiplicity {
                    association: association.name.clone(),
                    end: end.name.clone(),
                });
            }

            verify_multiplicity(&association.name, end)?;
        }
    }

    Ok(())
}

fn verify_multiplicity(owner: &str, property: &Property) -> Result<(), ModelError> {
    match property.multiplicity {
        Some(multiplicity) if !multiplicity.is_valid() => Err(ModelError::InvalidMultiplicity {
            owner: owner.to_string(),
            property: property.name.clone(),
            multiplicity,
        }),
        _ => Ok(()),
    }
}

fn verify_generalizations(model: &DomainModel) -> Result<(), ModelError> {
    let mut parent: HashMap<&str, &str> = HashMap::new();

    for generalization in &model.generalizations {
        for (name, other) in [
            (&generalization.general, &generalization.specific),
            (&generalization.specific, &generalization.general),
        ] {
            if model.get_class(name).is_none() {
                return Err(ModelError::UnknownClass {
                    referenced_by: other.clone(),
                    class: name.clone(),
                });
            }
        }

        match parent.get(generalization.specific.as_str()) {
            Some(existing) if *existing != generalization.general => {
                return Err(ModelError::MultipleGenerals {
                    class: generalization.specific.clone(),
                    first: existing.to_string(),
                    second: generalization.general.clone(),
                });
            }
            _ => {
                parent.insert(&generalization.specific, &generalization.general);
            }
        }
    }

    for start in parent.keys() {
        let mut visited = HashSet::new();
        let mut current = *start;
        while let Some(general) = parent.get(current) {
            if !visited.insert(current) {
                return Err(ModelError::GeneralizationCycle(current.to_string()));
            }
            current = *general;
        }
    }

    Ok(())
}
