//! Verified, arena-indexed view of a domain model.
//!
//! Classes live in a vector sorted by name and are addressed by [`ClassId`].
//! Each class carries an explicit pointer to its direct general, so that
//! ancestor chains can be walked without scanning the generalization set.
//! Association ends are resolved to class ids and put in a deterministic
//! order (class name, then role name).

use super::{DomainModel, Enumeration, Multiplicity, PrimitiveType, TypeRef};
use crate::error::ModelError;
use crate::verify;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Index of a class in the [`ModelIndex`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassId(pub usize);

/// One of the two ends of a binary association, in resolved order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// The end that sorts first.
    First,
    /// The end that sorts second.
    Second,
}

impl Side {
    /// Both sides, first to second.
    pub const BOTH: [Side; 2] = [Side::First, Side::Second];

    /// The other end.
    pub fn opposite(self) -> Self {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }

    /// Position of the end in [`BinaryAssociation::ends`].
    pub fn index(self) -> usize {
        match self {
            Side::First => 0,
            Side::Second => 1,
        }
    }
}

/// Resolved type of an attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeType {
    /// A primitive data type.
    Primitive(PrimitiveType),
    /// An enumeration, by name.
    Enumeration(String),
    /// A class in the arena.
    Class(ClassId),
}

/// An attribute declared directly on a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name.
    pub name: String,
    /// Resolved type.
    pub ty: AttributeType,
    /// Effective multiplicity (`1..1` unless declared).
    pub multiplicity: Multiplicity,
}

impl Attribute {
    /// Check if a value must be supplied.
    pub fn is_required(&self) -> bool {
        self.multiplicity.is_mandatory()
    }
}

/// A class in the arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassNode {
    /// Position in the arena.
    pub id: ClassId,
    /// Class name.
    pub name: String,
    /// Abstract classes are never constructed directly.
    pub is_abstract: bool,
    /// Attributes declared on this class only.
    pub attributes: Vec<Attribute>,
    /// Direct general, if any.
    pub general: Option<ClassId>,
    /// Direct specifics, sorted.
    pub specifics: Vec<ClassId>,
}

/// A resolved association end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociationEnd {
    /// Role name.
    pub role: String,
    /// Class at this end.
    pub class: ClassId,
    /// How many instances of `class` one instance of the opposite class links to.
    pub multiplicity: Multiplicity,
}

/// A two-ended association with its ends in deterministic order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryAssociation {
    /// Association name.
    pub name: String,
    /// Ends, ordered by (class name, role name).
    pub ends: [AssociationEnd; 2],
}

impl BinaryAssociation {
    /// Get the end on the given side.
    pub fn end(&self, side: Side) -> &AssociationEnd {
        &self.ends[side.index()]
    }

    /// Sides at which `class` participates (both for a self-association).
    pub fn sides_of(&self, class: ClassId) -> impl Iterator<Item = Side> + '_ {
        Side::BOTH
            .into_iter()
            .filter(move |side| self.end(*side).class == class)
    }

    /// Check if both ends admit more than one instance.
    pub fn is_many_to_many(&self) -> bool {
        self.ends.iter().all(|end| end.multiplicity.is_many())
    }
}

/// Verified, arena-indexed view of a [`DomainModel`].
#[derive(Debug, Clone)]
pub struct ModelIndex {
    name: String,
    classes: Vec<ClassNode>,
    by_name: BTreeMap<String, ClassId>,
    enumerations: Vec<Enumeration>,
    associations: Vec<BinaryAssociation>,
    unsupported: Vec<String>,
}

impl ModelIndex {
    /// Verify `model` and build its index.
    ///
    /// Associations with other than two ends are not an error: they are left
    /// out of the index and listed by [`ModelIndex::unsupported_associations`].
    pub fn build(model: &DomainModel) -> Result<Self, ModelError> {
        verify::verify_model(model)?;

        let mut sorted: Vec<_> = model.classes.iter().collect();
        sorted.sort_by(|a, b| a.name.cmp(&b.name));

        let by_name: BTreeMap<String, ClassId> = sorted
            .iter()
            .enumerate()
            .map(|(i, class)| (class.name.clone(), ClassId(i)))
            .collect();

        let lookup = |referenced_by: &str, name: &str| {
            by_name
                .get(name)
                .copied()
                .ok_or_else(|| ModelError::UnknownClass {
                    referenced_by: referenced_by.to_string(),
                    class: name.to_string(),
                })
        };

        let mut classes = Vec::with_capacity(sorted.len());
        for (i, class) in sorted.iter().enumerate() {
            let mut attributes = Vec::with_capacity(class.attributes.len());
            for attr in &class.attributes {
                let ty = match &attr.ty {
                    Some(TypeRef::Primitive(primitive)) => AttributeType::Primitive(*primitive),
                    Some(TypeRef::Enumeration(name)) => AttributeType::Enumeration(name.clone()),
                    Some(TypeRef::Class(name)) => AttributeType::Class(lookup(&class.name, name)?),
                    None => {
                        return Err(ModelError::UntypedProperty {
                            owner: class.name.clone(),
                            property: attr.name.clone(),
                        })
                    }
                };
                attributes.push(Attribute {
                    name: attr.name.clone(),
                    ty,
                    multiplicity: attr.effective_multiplicity(),
                });
            }

            classes.push(ClassNode {
                id: ClassId(i),
                name: class.name.clone(),
                is_abstract: class.is_abstract,
                attributes,
                general: None,
                specifics: Vec::new(),
            });
        }

        for generalization in &model.generalizations {
            let general = lookup(&generalization.specific, &generalization.general)?;
            let specific = lookup(&generalization.general, &generalization.specific)?;
            classes[specific.0].general = Some(general);
            classes[general.0].specifics.push(specific);
        }
        for class in &mut classes {
            class.specifics.sort();
            class.specifics.dedup();
        }

        let mut sorted_associations: Vec<_> = model.associations.iter().collect();
        sorted_associations.sort_by(|a, b| a.name.cmp(&b.name));

        let mut associations = Vec::new();
        let mut unsupported = Vec::new();
        for association in sorted_associations {
            if !association.is_binary() {
                warn!(
                    association = %association.name,
                    ends = association.ends.len(),
                    "skipping association without exactly two ends"
                );
                unsupported.push(association.name.clone());
                continue;
            }

            let mut ends = Vec::with_capacity(2);
            for end in &association.ends {
                let class_name = end.ty.as_ref().and_then(TypeRef::as_class).ok_or_else(|| {
                    ModelError::EndNotClass {
                        association: association.name.clone(),
                        end: end.name.clone(),
                    }
                })?;
                let multiplicity = end.multiplicity.ok_or_else(|| ModelError::MissingMultiplicity {
                    association: association.name.clone(),
                    end: end.name.clone(),
                })?;
                ends.push(AssociationEnd {
                    role: end.name.clone(),
                    class: lookup(&association.name, class_name)?,
                    multiplicity,
                });
            }

            // Ids follow class-name order, so this sorts by (class name, role name).
            ends.sort_by(|a, b| (a.class, &a.role).cmp(&(b.class, &b.role)));

            let mut ends = ends.into_iter();
            if let (Some(first), Some(second)) = (ends.next(), ends.next()) {
                associations.push(BinaryAssociation {
                    name: association.name.clone(),
                    ends: [first, second],
                });
            }
        }

        let mut enumerations = model.enumerations.clone();
        enumerations.sort_by(|a, b| a.name.cmp(&b.name));

        let index = ModelIndex {
            name: model.name.clone(),
            classes,
            by_name,
            enumerations,
            associations,
            unsupported,
        };

        verify::verify_fields(&index)?;

        debug!(
            model = %index.name,
            classes = index.classes.len(),
            associations = index.associations.len(),
            unsupported = index.unsupported.len(),
            "indexed model"
        );

        Ok(index)
    }

    /// Model name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All classes, sorted by name.
    pub fn classes(&self) -> &[ClassNode] {
        &self.classes
    }

    /// Get a class by id.
    pub fn class(&self, id: ClassId) -> &ClassNode {
        &self.classes[id.0]
    }

    /// Look up a class id by name.
    pub fn class_id(&self, name: &str) -> Option<ClassId> {
        self.by_name.get(name).copied()
    }

    /// Name of a class.
    pub fn class_name(&self, id: ClassId) -> &str {
        &self.classes[id.0].name
    }

    /// Direct general of a class.
    pub fn general(&self, id: ClassId) -> Option<ClassId> {
        self.classes[id.0].general
    }

    /// The generalization chain ending at `id`, root first.
    pub fn lineage(&self, id: ClassId) -> Vec<ClassId> {
        let mut chain = vec![id];
        let mut current = id;
        while let Some(general) = self.general(current) {
            chain.push(general);
            current = general;
        }
        chain.reverse();
        chain
    }

    /// Ancestors of `id`, root first, excluding `id` itself.
    pub fn ancestors(&self, id: ClassId) -> Vec<ClassId> {
        let mut lineage = self.lineage(id);
        lineage.pop();
        lineage
    }

    /// The storage root of the hierarchy containing `id`.
    pub fn root(&self, id: ClassId) -> ClassId {
        let mut current = id;
        while let Some(general) = self.general(current) {
            current = general;
        }
        current
    }

    /// Check if the class takes part in an inheritance hierarchy.
    pub fn in_hierarchy(&self, id: ClassId) -> bool {
        let class = self.class(id);
        class.general.is_some() || !class.specifics.is_empty()
    }

    /// Binary associations, sorted by name.
    pub fn associations(&self) -> &[BinaryAssociation] {
        &self.associations
    }

    /// Association ends at which `id` participates, in association order.
    pub fn associations_of(
        &self,
        id: ClassId,
    ) -> impl Iterator<Item = (&BinaryAssociation, Side)> + '_ {
        self.associations
            .iter()
            .flat_map(move |association| association.sides_of(id).map(move |side| (association, side)))
    }

    /// Enumerations, sorted by name.
    pub fn enumerations(&self) -> &[Enumeration] {
        &self.enumerations
    }

    /// Names of associations that were skipped for not having two ends.
    pub fn unsupported_associations(&self) -> &[String] {
        &self.unsupported
    }
}
