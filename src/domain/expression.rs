//! Linear-plus-bilinear expression algebra over decision variables.
//!
//! An [`Expression`] is a constant plus a sum of `coefficient * variable`
//! terms plus a sum of `coefficient * variable * variable` terms. Bilinear
//! term keys are normalized so the smaller variable key comes first; the pair
//! is the term's variable multiset, which downstream gateways use to
//! interpret degree-2 terms. Expressions are never linearized here.

use super::value_objects::VarKey;
use std::collections::BTreeMap;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expression {
    constant: f64,
    linear: BTreeMap<VarKey, f64>,
    bilinear: BTreeMap<(VarKey, VarKey), f64>,
}

impl Expression {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn constant(value: f64) -> Self {
        Self {
            constant: value,
            ..Self::default()
        }
    }

    /// Single linear term `coefficient * key`.
    pub fn term(coefficient: f64, key: VarKey) -> Self {
        let mut expr = Self::default();
        expr.add_term(coefficient, key);
        expr
    }

    /// Single bilinear term `coefficient * a * b`. The pair is stored
    /// unordered; `product(c, a, b)` and `product(c, b, a)` are the same term.
    pub fn product(coefficient: f64, a: VarKey, b: VarKey) -> Self {
        let mut expr = Self::default();
        expr.add_product(coefficient, a, b);
        expr
    }

    pub fn add_term(&mut self, coefficient: f64, key: VarKey) {
        let entry = self.linear.entry(key).or_insert(0.0);
        *entry += coefficient;
        if *entry == 0.0 {
            self.linear.remove(&key);
        }
    }

    pub fn add_product(&mut self, coefficient: f64, a: VarKey, b: VarKey) {
        let pair = if b < a { (b, a) } else { (a, b) };
        let entry = self.bilinear.entry(pair).or_insert(0.0);
        *entry += coefficient;
        if *entry == 0.0 {
            self.bilinear.remove(&pair);
        }
    }

    pub fn constant_term(&self) -> f64 {
        self.constant
    }

    pub fn linear_terms(&self) -> impl Iterator<Item = (VarKey, f64)> + '_ {
        self.linear.iter().map(|(k, c)| (*k, *c))
    }

    pub fn bilinear_terms(&self) -> impl Iterator<Item = ((VarKey, VarKey), f64)> + '_ {
        self.bilinear.iter().map(|(p, c)| (*p, *c))
    }

    pub fn is_quadratic(&self) -> bool {
        !self.bilinear.is_empty()
    }

    /// Every variable key referenced by the expression, with repeats.
    pub fn keys(&self) -> impl Iterator<Item = VarKey> + '_ {
        self.linear
            .keys()
            .copied()
            .chain(self.bilinear.keys().flat_map(|(a, b)| [*a, *b]))
    }

    /// Evaluate under a key-to-value mapping. Keys absent from the mapping
    /// contribute zero; completeness is enforced where mappings are built.
    pub fn evaluate(&self, values: &BTreeMap<VarKey, f64>) -> f64 {
        let value_of = |key: &VarKey| values.get(key).copied().unwrap_or(0.0);
        let mut total = self.constant;
        for (key, coefficient) in &self.linear {
            total += coefficient * value_of(key);
        }
        for ((a, b), coefficient) in &self.bilinear {
            total += coefficient * value_of(a) * value_of(b);
        }
        total
    }
}

impl AddAssign for Expression {
    fn add_assign(&mut self, rhs: Self) {
        self.constant += rhs.constant;
        for (key, coefficient) in rhs.linear {
            self.add_term(coefficient, key);
        }
        for ((a, b), coefficient) in rhs.bilinear {
            self.add_product(coefficient, a, b);
        }
    }
}

impl Add for Expression {
    type Output = Expression;

    fn add(mut self, rhs: Self) -> Expression {
        self += rhs;
        self
    }
}

impl Sub for Expression {
    type Output = Expression;

    fn sub(self, rhs: Self) -> Expression {
        self + (-rhs)
    }
}

impl Neg for Expression {
    type Output = Expression;

    fn neg(self) -> Expression {
        self * -1.0
    }
}

impl Mul<f64> for Expression {
    type Output = Expression;

    fn mul(mut self, rhs: f64) -> Expression {
        self.constant *= rhs;
        self.linear.retain(|_, c| {
            *c *= rhs;
            *c != 0.0
        });
        self.bilinear.retain(|_, c| {
            *c *= rhs;
            *c != 0.0
        });
        self
    }
}

impl Mul<Expression> for f64 {
    type Output = Expression;

    fn mul(self, rhs: Expression) -> Expression {
        rhs * self
    }
}

impl Sum for Expression {
    fn sum<I: Iterator<Item = Expression>>(iter: I) -> Expression {
        iter.fold(Expression::default(), |acc, e| acc + e)
    }
}
