//! Creation-contract synthesis.

use super::field::{
    contract_name, Contract, ContractField, ElementType, EnumDef, EnumLiteral, FieldOrigin,
    FieldType,
};
use crate::config::CompileConfig;
use crate::model::{Attribute, AttributeType, BinaryAssociation, ClassNode, ModelIndex, Side};
use crate::resolve::{Cardinality, ForeignKeyDecision, ForeignKeyTable};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Creation contracts for every class, plus the model's enumerations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContractSet {
    /// Contracts keyed by class name.
    pub contracts: BTreeMap<String, Contract>,
    /// Enumerations, ordered by name.
    pub enumerations: Vec<EnumDef>,
}

impl ContractSet {
    /// Get the contract of a class.
    pub fn get(&self, class: &str) -> Option<&Contract> {
        self.contracts.get(class)
    }

    /// Get an enumeration by name.
    pub fn enumeration(&self, name: &str) -> Option<&EnumDef> {
        self.enumerations.iter().find(|e| e.name == name)
    }

    /// Contracts along the inheritance chain ending at `class`, root first.
    pub fn lineage(&self, class: &str) -> Vec<&Contract> {
        let mut chain = Vec::new();
        let mut current = self.contracts.get(class);
        while let Some(contract) = current {
            chain.push(contract);
            current = contract
                .parent_class
                .as_deref()
                .and_then(|parent| self.contracts.get(parent));
        }
        chain.reverse();
        chain
    }

    /// The effective field set of `class`: every ancestor's own fields, root
    /// first, followed by the class's own fields.
    pub fn effective_fields(&self, class: &str) -> Vec<&ContractField> {
        self.lineage(class)
            .into_iter()
            .flat_map(|contract| contract.fields.iter())
            .collect()
    }
}

/// Derives per-class creation contracts from the model and the foreign-key
/// decisions.
///
/// Relationship fields are named after the opposite end's role:
///
/// | shape from this class           | field                                    |
/// |---------------------------------|------------------------------------------|
/// | holds the reference (1:1, N:1)  | reference id, required per the decision  |
/// | other side of a 1:1             | optional reference id                    |
/// | other side of a 1:N             | optional list of ids                     |
/// | N:M                             | optional list of ids, or of id-or-nested |
pub struct ContractSynthesizer<'a> {
    index: &'a ModelIndex,
    decisions: &'a ForeignKeyTable,
    nested_creations: bool,
}

impl<'a> ContractSynthesizer<'a> {
    /// Create a synthesizer over a model and its decisions.
    pub fn new(index: &'a ModelIndex, decisions: &'a ForeignKeyTable, config: &CompileConfig) -> Self {
        Self {
            index,
            decisions,
            nested_creations: config.nested_creations,
        }
    }

    /// Build the contract set.
    #[instrument(skip_all, fields(model = %self.index.name(), nested = self.nested_creations))]
    pub fn synthesize(&self) -> ContractSet {
        let contracts: BTreeMap<_, _> = self
            .index
            .classes()
            .iter()
            .map(|class| (class.name.clone(), self.contract(class)))
            .collect();
        let enumerations = self.enumerations();

        debug!(
            contracts = contracts.len(),
            enumerations = enumerations.len(),
            "synthesized creation contracts"
        );

        ContractSet {
            contracts,
            enumerations,
        }
    }

    fn contract(&self, class: &ClassNode) -> Contract {
        let parent_class = class
            .general
            .map(|general| self.index.class_name(general).to_string());

        let attribute_fields = class.attributes.iter().map(|attr| self.attribute_field(attr));
        let relationship_fields = self
            .index
            .associations_of(class.id)
            .filter_map(|(association, side)| self.relationship_field(association, side));

        Contract {
            class: class.name.clone(),
            name: contract_name(&class.name),
            parent: parent_class.as_deref().map(contract_name),
            parent_class,
            is_abstract: class.is_abstract,
            fields: attribute_fields.chain(relationship_fields).collect(),
        }
    }

    fn attribute_field(&self, attr: &Attribute) -> ContractField {
        let ty = match &attr.ty {
            AttributeType::Primitive(primitive) => FieldType::Primitive {
                primitive: *primitive,
            },
            AttributeType::Enumeration(name) => FieldType::Enumeration { name: name.clone() },
            AttributeType::Class(id) => FieldType::Reference {
                class: self.index.class_name(*id).to_string(),
            },
        };

        ContractField {
            name: attr.name.clone(),
            ty,
            required: attr.is_required(),
            origin: FieldOrigin::Attribute,
        }
    }

    fn relationship_field(&self, association: &BinaryAssociation, side: Side) -> Option<ContractField> {
        let decision = self.decisions.get(&association.name)?;
        let own = association.end(side);
        let opposite = association.end(side.opposite());
        let class = self.index.class_name(opposite.class).to_string();

        let (ty, required, owns_reference) = match decision {
            ForeignKeyDecision::Reference(fk) if fk.owner_side == side => {
                (FieldType::Reference { class }, fk.required, true)
            }
            ForeignKeyDecision::Reference(_) if opposite.multiplicity.is_many() => (
                FieldType::List {
                    class,
                    element: ElementType::ByReference,
                },
                false,
                false,
            ),
            ForeignKeyDecision::Reference(_) => (FieldType::Reference { class }, false, false),
            ForeignKeyDecision::JoinTable { .. } => {
                let element = if self.nested_creations {
                    ElementType::ByReferenceOrValue {
                        contract: contract_name(&class),
                    }
                } else {
                    ElementType::ByReference
                };
                (FieldType::List { class, element }, false, false)
            }
        };

        Some(ContractField {
            name: opposite.role.clone(),
            ty,
            required,
            origin: FieldOrigin::Relationship {
                association: association.name.clone(),
                cardinality: Cardinality::between(own.multiplicity, opposite.multiplicity),
                owns_reference,
            },
        })
    }

    fn enumerations(&self) -> Vec<EnumDef> {
        self.index
            .enumerations()
            .iter()
            .map(|enumeration| EnumDef {
                name: enumeration.name.clone(),
                literals: enumeration.literals.iter().map(EnumLiteral::new).collect(),
            })
            .collect()
    }
}
