//! Foreign-key placement for binary associations.

use super::{Cardinality, ForeignKey, ForeignKeyDecision, ForeignKeyTable};
use crate::model::{BinaryAssociation, ModelIndex, Side};
use tracing::{debug, instrument};

/// Decides, for every binary association, which class holds the reference
/// column and under which role name, or that a join table is needed.
///
/// With `A`, `B` the ends in resolved order:
///
/// | A.max | B.max | minimums          | reference on | role   |
/// |-------|-------|-------------------|--------------|--------|
/// | 1     | 1     | A > 0, B = 0      | B's class    | A.role |
/// | 1     | 1     | A = 0, B > 0      | A's class    | B.role |
/// | 1     | 1     | both > 0 or = 0   | A's class    | B.role |
/// | > 1   | ≤ 1   |                   | A's class    | B.role |
/// | ≤ 1   | > 1   |                   | B's class    | A.role |
/// | > 1   | > 1   |                   | join table   |        |
#[derive(Debug, Clone, Copy, Default)]
pub struct ForeignKeyResolver;

impl ForeignKeyResolver {
    /// Create a resolver.
    pub fn new() -> Self {
        Self
    }

    /// Resolve every binary association of the model into a decision table.
    #[instrument(skip_all, fields(model = %index.name()))]
    pub fn resolve_all(&self, index: &ModelIndex) -> ForeignKeyTable {
        let table = ForeignKeyTable::from_decisions(
            index
                .associations()
                .iter()
                .map(|association| self.resolve(index, association)),
        );

        debug!(
            decisions = table.len(),
            join_tables = table.join_tables().count(),
            "resolved foreign keys"
        );

        table
    }

    /// Resolve a single association.
    pub fn resolve(&self, index: &ModelIndex, association: &BinaryAssociation) -> ForeignKeyDecision {
        let Some(owner_side) = Self::owner_side(association) else {
            debug!(association = %association.name, "many-to-many, join table required");
            return ForeignKeyDecision::JoinTable {
                association: association.name.clone(),
            };
        };

        let owner = association.end(owner_side);
        let referenced = association.end(owner_side.opposite());

        let fk = ForeignKey {
            association: association.name.clone(),
            owner: owner.class,
            owner_class: index.class_name(owner.class).to_string(),
            owner_side,
            owner_role: owner.role.clone(),
            target: referenced.class,
            target_class: index.class_name(referenced.class).to_string(),
            role: referenced.role.clone(),
            required: referenced.multiplicity.is_mandatory(),
            cardinality: Cardinality::between(owner.multiplicity, referenced.multiplicity),
        };

        debug!(
            association = %fk.association,
            owner = %fk.owner_class,
            role = %fk.role,
            required = fk.required,
            "placed foreign key"
        );

        ForeignKeyDecision::Reference(fk)
    }

    /// Side of the end whose class holds the reference, or `None` for
    /// many-to-many.
    fn owner_side(association: &BinaryAssociation) -> Option<Side> {
        let a = association.end(Side::First).multiplicity;
        let b = association.end(Side::Second).multiplicity;

        match (a.is_many(), b.is_many()) {
            (false, false) => {
                if a.is_mandatory() && b.is_optional() {
                    Some(Side::Second)
                } else {
                    // A mandatory on B only, or a tie: the first class owns it.
                    Some(Side::First)
                }
            }
            (true, false) => Some(Side::First),
            (false, true) => Some(Side::Second),
            (true, true) => None,
        }
    }
}
