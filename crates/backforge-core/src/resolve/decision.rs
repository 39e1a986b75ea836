//! Foreign-key placement decisions.

use crate::model::{ClassId, Multiplicity, Side};
use serde::Serialize;
use std::collections::BTreeMap;

/// Shape of a relationship seen from one participating class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    /// One instance on each side.
    OneToOne,
    /// Many instances of this class per instance of the other class.
    ManyToOne,
    /// Many instances of the other class per instance of this class.
    OneToMany,
    /// Many on both sides.
    ManyToMany,
}

impl Cardinality {
    /// Cardinality for a class whose own end has multiplicity `own` and whose
    /// opposite end has multiplicity `opposite`.
    pub fn between(own: Multiplicity, opposite: Multiplicity) -> Self {
        match (own.is_many(), opposite.is_many()) {
            (false, false) => Cardinality::OneToOne,
            (true, false) => Cardinality::ManyToOne,
            (false, true) => Cardinality::OneToMany,
            (true, true) => Cardinality::ManyToMany,
        }
    }

    /// Short label, e.g. `N:1`.
    pub fn label(&self) -> &'static str {
        match self {
            Cardinality::OneToOne => "1:1",
            Cardinality::ManyToOne => "N:1",
            Cardinality::OneToMany => "1:N",
            Cardinality::ManyToMany => "N:M",
        }
    }
}

impl std::fmt::Display for Cardinality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A reference column placed on one participant of an association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForeignKey {
    /// Association name.
    pub association: String,
    /// Class holding the reference.
    #[serde(skip)]
    pub owner: ClassId,
    /// Name of the owning class.
    pub owner_class: String,
    /// Side of the owning class's end.
    pub owner_side: Side,
    /// Role name of the owning class's end.
    pub owner_role: String,
    /// Referenced class.
    #[serde(skip)]
    pub target: ClassId,
    /// Name of the referenced class.
    pub target_class: String,
    /// Reference role name: the role of the referenced end.
    pub role: String,
    /// Whether every owner instance must carry the reference.
    ///
    /// True iff the referenced end's minimum is above zero.
    pub required: bool,
    /// Shape from the owner's point of view: `OneToOne` or `ManyToOne`.
    pub cardinality: Cardinality,
}

impl ForeignKey {
    /// Storage column name, `<role>_id`.
    pub fn column_name(&self) -> String {
        format!("{}_id", self.role)
    }
}

/// The single placement decision for a binary association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ForeignKeyDecision {
    /// One participant holds a reference column.
    Reference(ForeignKey),
    /// Many-to-many: no participant holds a reference; a join table is needed.
    JoinTable {
        /// Association name.
        association: String,
    },
}

impl ForeignKeyDecision {
    /// Name of the association this decision is for.
    pub fn association(&self) -> &str {
        match self {
            ForeignKeyDecision::Reference(fk) => &fk.association,
            ForeignKeyDecision::JoinTable { association } => association,
        }
    }

    /// The foreign key, if one participant owns the reference.
    pub fn as_reference(&self) -> Option<&ForeignKey> {
        match self {
            ForeignKeyDecision::Reference(fk) => Some(fk),
            ForeignKeyDecision::JoinTable { .. } => None,
        }
    }

    /// Check if a join table is required.
    pub fn is_join_table(&self) -> bool {
        matches!(self, ForeignKeyDecision::JoinTable { .. })
    }
}

/// Immutable table of decisions, one per binary association, keyed by
/// association name.
///
/// Built once per compile run and shared read-only by the storage and contract
/// synthesizers, so both see exactly the same placements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ForeignKeyTable {
    decisions: BTreeMap<String, ForeignKeyDecision>,
}

impl ForeignKeyTable {
    pub(crate) fn from_decisions(decisions: impl IntoIterator<Item = ForeignKeyDecision>) -> Self {
        Self {
            decisions: decisions
                .into_iter()
                .map(|decision| (decision.association().to_string(), decision))
                .collect(),
        }
    }

    /// Get the decision for an association.
    pub fn get(&self, association: &str) -> Option<&ForeignKeyDecision> {
        self.decisions.get(association)
    }

    /// All decisions, ordered by association name.
    pub fn iter(&self) -> impl Iterator<Item = &ForeignKeyDecision> {
        self.decisions.values()
    }

    /// Foreign keys held by `class`, ordered by association name.
    pub fn owned_by(&self, class: ClassId) -> impl Iterator<Item = &ForeignKey> + '_ {
        self.iter()
            .filter_map(ForeignKeyDecision::as_reference)
            .filter(move |fk| fk.owner == class)
    }

    /// Names of associations that need a join table.
    pub fn join_tables(&self) -> impl Iterator<Item = &str> {
        self.iter()
            .filter(|decision| decision.is_join_table())
            .map(ForeignKeyDecision::association)
    }

    /// Number of decisions.
    pub fn len(&self) -> usize {
        self.decisions.len()
    }

    /// Check if there are no decisions.
    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cardinality_between() {
        let one = Multiplicity::one();
        let many = Multiplicity::many();

        assert_eq!(Cardinality::between(one, one), Cardinality::OneToOne);
        assert_eq!(Cardinality::between(many, one), Cardinality::ManyToOne);
        assert_eq!(Cardinality::between(one, many), Cardinality::OneToMany);
        assert_eq!(Cardinality::between(many, many), Cardinality::ManyToMany);
        assert_eq!(Cardinality::ManyToOne.label(), "N:1");
    }

    #[test]
    fn test_table_lookup() {
        let table = ForeignKeyTable::from_decisions([
            ForeignKeyDecision::JoinTable {
                association: "Enrollment".into(),
            },
            ForeignKeyDecision::JoinTable {
                association: "Authorship".into(),
            },
        ]);

        assert_eq!(table.len(), 2);
        assert!(table.get("Enrollment").is_some_and(ForeignKeyDecision::is_join_table));
        let names: Vec<_> = table.join_tables().collect();
        assert_eq!(names, ["Authorship", "Enrollment"]);
    }
}
