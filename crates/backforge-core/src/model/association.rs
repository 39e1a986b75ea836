//! Associations and generalizations between classes.

use super::{Multiplicity, Property};
use serde::{Deserialize, Serialize};

/// An association between classes.
///
/// Only two-ended associations can be represented in storage; others are
/// reported as unsupported by the compiler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Association {
    /// Association name (unique within the model).
    pub name: String,
    /// Association ends, each typed by a class.
    pub ends: Vec<Property>,
}

impl Association {
    /// Create an association without ends.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ends: Vec::new(),
        }
    }

    /// Create a binary association from its two ends.
    pub fn binary(name: impl Into<String>, first: Property, second: Property) -> Self {
        Self {
            name: name.into(),
            ends: vec![first, second],
        }
    }

    /// Add an end.
    pub fn with_end(mut self, end: Property) -> Self {
        self.ends.push(end);
        self
    }

    /// Add an end bound to `class` with the given role and multiplicity.
    pub fn with_role(
        self,
        role: impl Into<String>,
        class: impl Into<String>,
        multiplicity: Multiplicity,
    ) -> Self {
        self.with_end(Property::end(role, class, multiplicity))
    }

    /// Check if this association has exactly two ends.
    pub fn is_binary(&self) -> bool {
        self.ends.len() == 2
    }
}

/// A generalization: `specific` inherits from `general`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Generalization {
    /// The parent class.
    pub general: String,
    /// The child class.
    pub specific: String,
}

impl Generalization {
    /// Create a generalization.
    pub fn new(general: impl Into<String>, specific: impl Into<String>) -> Self {
        Self {
            general: general.into(),
            specific: specific.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_association() {
        let assoc = Association::new("EmployeeDepartment")
            .with_role("department", "Department", Multiplicity::one())
            .with_role("employees", "Employee", Multiplicity::many());

        assert!(assoc.is_binary());
        assert_eq!(assoc.ends[0].name, "department");
    }

    #[test]
    fn test_ternary_is_not_binary() {
        let assoc = Association::new("Meeting")
            .with_role("host", "Person", Multiplicity::one())
            .with_role("guest", "Person", Multiplicity::many())
            .with_role("room", "Room", Multiplicity::one());

        assert!(!assoc.is_binary());
    }
}
