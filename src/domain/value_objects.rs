// Domain value objects representing core model concepts

use serde::Serialize;
use std::fmt;

/// Direction of optimization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Sense {
    /// Minimize the objective expression
    Minimize,
    /// Maximize the objective expression
    Maximize,
}

impl fmt::Display for Sense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sense::Minimize => write!(f, "minimize"),
            Sense::Maximize => write!(f, "maximize"),
        }
    }
}

/// Comparison relation of a constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Relation {
    /// Less than or equal (≤)
    Le,
    /// Equal (=)
    Eq,
    /// Greater than or equal (≥)
    Ge,
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relation::Le => write!(f, "<="),
            Relation::Eq => write!(f, "="),
            Relation::Ge => write!(f, ">="),
        }
    }
}

/// Domain of a decision variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Domain {
    /// Binary variable (x ∈ {0, 1})
    Binary,
    /// Integer variable (x ∈ {0, 1, ..., upper_bound})
    Integer { upper_bound: i64 },
}

impl Domain {
    pub fn upper_bound(&self) -> f64 {
        match self {
            Domain::Binary => 1.0,
            Domain::Integer { upper_bound } => *upper_bound as f64,
        }
    }

    /// Whether `value` lies in this domain, allowing `tolerance` on both
    /// integrality and the bounds.
    pub fn contains(&self, value: f64, tolerance: f64) -> bool {
        let integral = (value - value.round()).abs() <= tolerance;
        integral && value >= -tolerance && value <= self.upper_bound() + tolerance
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, Domain::Binary)
    }
}

/// Opaque identity of a decision variable.
///
/// Keys have a total order: all bare-index keys sort before composite keys,
/// and keys of the same shape sort lexicographically. That order fixes the
/// variable listing in reports; tie-breaks between equal-objective solutions
/// are solver-defined (first returned wins).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum VarKey {
    /// Bare index, e.g. the i-th item or the j-th supplier
    Index(u32),
    /// Composite index, e.g. (supplier, item)
    Pair(u32, u32),
}

impl fmt::Display for VarKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarKey::Index(i) => write!(f, "x{}", i),
            VarKey::Pair(a, b) => write!(f, "x({},{})", a, b),
        }
    }
}
