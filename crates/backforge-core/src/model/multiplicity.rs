//! Multiplicity bounds on properties and association ends.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Upper bound of a multiplicity.
///
/// Serialized as a number, or `"*"` when unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UpperBound {
    /// At most `n` instances.
    Bounded(u32),
    /// Any number of instances.
    Unbounded,
}

impl UpperBound {
    /// Check if the bound admits more than one instance.
    pub fn is_many(&self) -> bool {
        match self {
            UpperBound::Bounded(n) => *n > 1,
            UpperBound::Unbounded => true,
        }
    }
}

impl From<u32> for UpperBound {
    fn from(n: u32) -> Self {
        UpperBound::Bounded(n)
    }
}

impl fmt::Display for UpperBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpperBound::Bounded(n) => write!(f, "{}", n),
            UpperBound::Unbounded => f.write_str("*"),
        }
    }
}

impl Serialize for UpperBound {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            UpperBound::Bounded(n) => serializer.serialize_u32(*n),
            UpperBound::Unbounded => serializer.serialize_str("*"),
        }
    }
}

impl<'de> Deserialize<'de> for UpperBound {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Count(u32),
            Symbol(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Count(n) => Ok(UpperBound::Bounded(n)),
            Raw::Symbol(s) if s == "*" => Ok(UpperBound::Unbounded),
            Raw::Symbol(s) => Err(serde::de::Error::custom(format!(
                "invalid upper bound '{}', expected a number or '*'",
                s
            ))),
        }
    }
}

/// Multiplicity `min..max` of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Multiplicity {
    /// Minimum number of instances.
    pub min: u32,
    /// Maximum number of instances.
    pub max: UpperBound,
}

impl Multiplicity {
    /// Create a bounded multiplicity.
    pub fn new(min: u32, max: u32) -> Self {
        Self {
            min,
            max: UpperBound::Bounded(max),
        }
    }

    /// Create a multiplicity with no upper bound (`min..*`).
    pub fn unbounded(min: u32) -> Self {
        Self {
            min,
            max: UpperBound::Unbounded,
        }
    }

    /// Exactly one (`1..1`).
    pub fn one() -> Self {
        Self::new(1, 1)
    }

    /// Zero or one (`0..1`).
    pub fn optional() -> Self {
        Self::new(0, 1)
    }

    /// Zero or more (`0..*`).
    pub fn many() -> Self {
        Self::unbounded(0)
    }

    /// Check if the lower bound allows no instance at all.
    pub fn is_optional(&self) -> bool {
        self.min == 0
    }

    /// Check if at least one instance is required.
    pub fn is_mandatory(&self) -> bool {
        self.min > 0
    }

    /// Check if more than one instance is admitted.
    pub fn is_many(&self) -> bool {
        self.max.is_many()
    }

    /// Check if at most one instance is admitted.
    pub fn is_single(&self) -> bool {
        !self.is_many()
    }

    /// Check the `min <= max` and `max >= 1` invariants.
    pub fn is_valid(&self) -> bool {
        match self.max {
            UpperBound::Bounded(max) => max >= 1 && self.min <= max,
            UpperBound::Unbounded => true,
        }
    }
}

impl Default for Multiplicity {
    fn default() -> Self {
        Self::one()
    }
}

impl fmt::Display for Multiplicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiplicity_shapes() {
        assert!(Multiplicity::one().is_single());
        assert!(Multiplicity::one().is_mandatory());
        assert!(Multiplicity::optional().is_optional());
        assert!(Multiplicity::many().is_many());
        assert!(Multiplicity::new(0, 5).is_many());
    }

    #[test]
    fn test_multiplicity_validity() {
        assert!(Multiplicity::new(0, 1).is_valid());
        assert!(Multiplicity::unbounded(3).is_valid());
        assert!(!Multiplicity::new(2, 1).is_valid());
        assert!(!Multiplicity::new(0, 0).is_valid());
    }

    #[test]
    fn test_upper_bound_json() {
        let m: Multiplicity = serde_json::from_str(r#"{"min":0,"max":"*"}"#).unwrap();
        assert_eq!(m, Multiplicity::many());

        let m: Multiplicity = serde_json::from_str(r#"{"min":1,"max":1}"#).unwrap();
        assert_eq!(m, Multiplicity::one());

        let err = serde_json::from_str::<Multiplicity>(r#"{"min":1,"max":"n"}"#);
        assert!(err.is_err());

        assert_eq!(
            serde_json::to_string(&Multiplicity::unbounded(1)).unwrap(),
            r#"{"min":1,"max":"*"}"#
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Multiplicity::many().to_string(), "0..*");
        assert_eq!(Multiplicity::one().to_string(), "1..1");
    }
}
